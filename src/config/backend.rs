//! Backend connection configuration

use serde::{Deserialize, Serialize};

/// Where the Pingpad backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API, without the `/api` prefix
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Bearer token from a previous login. Usually supplied via `PINGPAD_TOKEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_seconds: 30,
            token: None,
        }
    }
}

impl BackendConfig {
    /// Base URL with any trailing slash removed.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
