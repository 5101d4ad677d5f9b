use crate::error::Result;
use crate::storage::{LocalStore, DARK_MODE_KEY};

/// Dark/light preference, persisted under `darkMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreference {
    pub dark: bool,
}

impl ThemePreference {
    /// A stored choice wins; otherwise follow the terminal background.
    pub fn load(store: &LocalStore) -> Result<Self> {
        let stored = store.get(DARK_MODE_KEY)?;
        let dark = match stored.as_deref() {
            Some(value) => value == "true",
            None => system_prefers_dark(std::env::var("COLORFGBG").ok().as_deref()),
        };
        Ok(Self { dark })
    }

    pub fn save(&self, store: &LocalStore) -> Result<()> {
        store.set(DARK_MODE_KEY, if self.dark { "true" } else { "false" })
    }

    /// Flip and persist. Left unchanged when the store write fails.
    pub fn toggle(&mut self, store: &LocalStore) -> Result<()> {
        let flipped = Self { dark: !self.dark };
        flipped.save(store)?;
        *self = flipped;
        Ok(())
    }

    pub fn label(&self) -> &'static str {
        if self.dark {
            "dark"
        } else {
            "light"
        }
    }
}

/// Reads a `COLORFGBG`-style value (`"15;0"`): the last field is the
/// background palette index, where 0-6 and 8 are dark colours.
pub fn system_prefers_dark(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map(|bg| bg <= 6 || bg == 8)
        .unwrap_or(false)
}
