//! Configuration module for Pingpad
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PINGPAD_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use pingpad::config::PingpadConfig;
//!
//! let config = PingpadConfig::default();
//! assert_eq!(config.backend.base_url, "http://localhost:8080");
//!
//! let toml = r#"
//! [backend]
//! base_url = "https://pingpad.example.com"
//! "#;
//! let config: PingpadConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.backend.base_url, "https://pingpad.example.com");
//! ```

pub mod backend;
pub mod error;
pub mod logging;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

// Section configs owned by the modules that consume them
pub use crate::analytics::{AnalyticsConfig, MissingResponseTime};
pub use crate::poller::{OverlapPolicy, PollingConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Pingpad client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PingpadConfig {
    /// Backend connection settings
    pub backend: BackendConfig,
    /// Alarm feed polling
    pub polling: PollingConfig,
    /// Aggregation policies
    pub analytics: AnalyticsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl PingpadConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports PINGPAD_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("PINGPAD_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Ok(token) = std::env::var("PINGPAD_TOKEN") {
            if !token.trim().is_empty() {
                self.backend.token = Some(token.trim().to_string());
            }
        }
        if let Ok(timeout) = std::env::var("PINGPAD_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.backend.timeout_seconds = t;
            }
        }

        if let Ok(level) = std::env::var("PINGPAD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PINGPAD_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(interval) = std::env::var("PINGPAD_ALARM_INTERVAL") {
            if let Ok(i) = interval.parse() {
                self.polling.alarm_interval_seconds = i;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "backend.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if let Err(e) = reqwest::Url::parse(self.backend.normalized_base_url()) {
            return Err(ConfigError::Validation {
                field: "backend.base_url".to_string(),
                message: e.to_string(),
            });
        }
        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.polling.alarm_interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "polling.alarm_interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
