use std::path::PathBuf;
use std::time::Duration;

/// Used when neither the flag nor the environment names a backend.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "EXPENSE_API_URL";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "EXPENSE_DESK_LOG";

const STORE_FILE: &str = "session.db";

/// Runtime configuration for the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend root without the `/api` suffix
    pub api_url: String,
    /// Where the session store lives
    pub data_dir: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Flag value first, then `EXPENSE_API_URL`, then the default.
    pub fn resolve(api_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        let api_url = api_url
            .or_else(|| std::env::var(API_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_url: normalize_url(&api_url),
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_url(api_url);
        self
    }

    /// Base for every endpoint path, e.g. `http://localhost:5000/api`.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.api_url)
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            timeout: Duration::from_secs(30),
        }
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("expense-desk"))
        .unwrap_or_else(|| PathBuf::from(".expense-desk"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_and_is_normalized() {
        let config = Config::resolve(
            Some("https://expenses.example.com/ ".to_string()),
            Some(PathBuf::from("/tmp/desk")),
        );
        assert_eq!(config.api_url, "https://expenses.example.com");
        assert_eq!(config.api_base(), "https://expenses.example.com/api");
        assert_eq!(config.store_path(), PathBuf::from("/tmp/desk/session.db"));
    }

    #[test]
    fn test_with_api_url_trims_slashes() {
        let config = Config::default().with_api_url("http://127.0.0.1:8080//");
        assert_eq!(config.api_base(), "http://127.0.0.1:8080/api");
    }

    #[test]
    fn test_default_points_at_localhost() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.store_path().ends_with("session.db"));
    }
}
