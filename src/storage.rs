use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::Result;
use crate::models::User;

/// Bearer token for the current session.
pub const TOKEN_KEY: &str = "token";
/// JSON copy of the logged-in user.
pub const USER_KEY: &str = "user";
/// `"true"` / `"false"` theme preference.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Persistent string key/value store backing the session.
///
/// One row per key in a small SQLite table, shared by the client and the
/// session.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open (or create) the store file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        setup_store(&conn)?;
        tracing::debug!(path = %path.display(), "session store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_store(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ========================================================================
    // SESSION HELPERS
    // ========================================================================

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.get(TOKEN_KEY)?.filter(|token| !token.is_empty()))
    }

    /// Cached user, or `None` when missing or unreadable.
    pub fn user(&self) -> Result<Option<User>> {
        let raw = match self.get(USER_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable cached user");
                Ok(None)
            }
        }
    }

    pub fn save_session(&self, token: &str, user: &User) -> Result<()> {
        self.set(TOKEN_KEY, token)?;
        self.set(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    /// Drop token and user; other keys (theme) survive a logout.
    pub fn clear_session(&self) -> Result<()> {
        self.remove(TOKEN_KEY)?;
        self.remove(USER_KEY)?;
        Ok(())
    }

    /// Reads keep working, every write fails.
    #[cfg(test)]
    pub(crate) fn make_read_only(&self) -> Result<()> {
        self.conn().pragma_update(None, "query_only", true)?;
        Ok(())
    }
}

fn setup_store(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    Ok(())
}
