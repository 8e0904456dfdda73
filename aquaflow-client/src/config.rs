//! Client configuration

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default directory for the persisted session
pub const DEFAULT_STORAGE_DIR: &str = ".aquaflow";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Client configuration for connecting to the AquaFlow backend
///
/// | Variable | Default |
/// |----------|---------|
/// | `AQUAFLOW_API_URL` (fallback `NEXT_PUBLIC_API_URL`) | `http://localhost:8000` |
/// | `AQUAFLOW_TIMEOUT_SECS` | `10` |
/// | `AQUAFLOW_STORAGE_DIR` | `.aquaflow` |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding `auth-storage.json`
    pub storage_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("AQUAFLOW_API_URL")
            .or_else(|_| std::env::var("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let mut config = Self::new(base_url);

        if let Ok(raw) = std::env::var("AQUAFLOW_TIMEOUT_SECS") {
            let timeout = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "AQUAFLOW_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config = config.with_timeout(timeout);
        }

        if let Ok(dir) = std::env::var("AQUAFLOW_STORAGE_DIR") {
            config = config.with_storage_dir(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the session storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Check the base URL parses as an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = url::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if self.timeout == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout",
                value: "0".into(),
            });
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
