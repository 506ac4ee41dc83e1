//! Contest API configuration from environment variables

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://clist.by/api/v4/contest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LIMIT: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Configuration for the contest-listing client
///
/// Loaded from environment variables with sensible defaults.
#[derive(Clone)]
pub struct ClistConfig {
    /// Contest endpoint (no trailing slash)
    pub base_url: String,

    pub username: String,

    pub api_key: String,

    /// Bounded wait for the single outbound request
    pub timeout: Duration,

    /// Result cap sent as `limit`
    pub limit: u32,

    /// Optional JSON file replacing the built-in platform table
    pub platforms_path: Option<PathBuf>,
}

// api_key stays out of Debug output so the config can be logged at startup
impl std::fmt::Debug for ClistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClistConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("limit", &self.limit)
            .field("platforms_path", &self.platforms_path)
            .finish()
    }
}

impl ClistConfig {
    /// Build a config with defaults for everything but the credentials
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: username.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            limit: DEFAULT_LIMIT,
            platforms_path: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CLIST_USERNAME` (required)
    /// - `CLIST_API_KEY` (required)
    /// - `CLIST_BASE_URL` (default: https://clist.by/api/v4/contest)
    /// - `CLIST_TIMEOUT_SECS` (default: 15)
    /// - `CLIST_LIMIT` (default: 1000)
    /// - `CONTEST_PLATFORMS_PATH` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let username = env::var("CLIST_USERNAME")
            .map_err(|_| ConfigError::MissingVariable("CLIST_USERNAME".to_string()))?;
        let api_key = env::var("CLIST_API_KEY")
            .map_err(|_| ConfigError::MissingVariable("CLIST_API_KEY".to_string()))?;

        let base_url = env::var("CLIST_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "CLIST_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        let timeout_secs = env::var("CLIST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let limit = env::var("CLIST_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_LIMIT);

        let platforms_path = env::var("CONTEST_PLATFORMS_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            base_url,
            username,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            limit,
            platforms_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "CLIST_USERNAME",
        "CLIST_API_KEY",
        "CLIST_BASE_URL",
        "CLIST_TIMEOUT_SECS",
        "CLIST_LIMIT",
        "CONTEST_PLATFORMS_PATH",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    // Env vars are process-global, so every scenario runs inside one test
    #[test]
    fn test_config_from_env() {
        clear_env();
        match ClistConfig::from_env() {
            Err(ConfigError::MissingVariable(var)) => assert_eq!(var, "CLIST_USERNAME"),
            other => panic!("expected missing username, got {:?}", other),
        }

        env::set_var("CLIST_USERNAME", "alice");
        env::set_var("CLIST_API_KEY", "secret");
        let config = ClistConfig::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.limit, 1000);
        assert!(config.platforms_path.is_none());

        env::set_var("CLIST_BASE_URL", "http://127.0.0.1:9000/api/");
        env::set_var("CLIST_TIMEOUT_SECS", "3");
        env::set_var("CLIST_LIMIT", "50");
        env::set_var("CONTEST_PLATFORMS_PATH", "/etc/contestflow/platforms.json");
        let config = ClistConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.limit, 50);
        assert_eq!(
            config.platforms_path,
            Some(PathBuf::from("/etc/contestflow/platforms.json"))
        );

        env::set_var("CLIST_BASE_URL", "ftp://clist.by");
        assert!(matches!(
            ClistConfig::from_env(),
            Err(ConfigError::InvalidValue(_))
        ));

        clear_env();
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClistConfig::new("alice", "very-secret-key");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("very-secret-key"));
    }
}
