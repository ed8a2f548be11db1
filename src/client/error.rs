//! Error types for backend calls.

use crate::model::ValidationError;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while talking to the Pingpad backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Backend returned an error response (4xx, 5xx).
    #[error("Backend error {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Backend response doesn't match expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Input rejected before any request was sent.
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Backend refused the credentials (HTTP 401).
    #[error("Not authenticated: log in or set PINGPAD_TOKEN")]
    NotAuthenticated,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    details: Option<serde_json::Value>,
}

impl ApiError {
    /// Build an error from a non-2xx response.
    ///
    /// Prefers a structured `{error, details}` body, then the raw text, then
    /// a generic `status N` message.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::NotAuthenticated;
        }

        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.error.or(parsed.message) {
                let details = parsed.details.and_then(|d| match d {
                    serde_json::Value::Null => None,
                    serde_json::Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                });
                return ApiError::Upstream {
                    status,
                    message,
                    details,
                };
            }
        }

        let text = body.trim();
        let message = if text.is_empty() {
            format!("status {}", status)
        } else {
            text.to_string()
        };
        ApiError::Upstream {
            status,
            message,
            details: None,
        }
    }

    /// Classify a transport failure.
    pub fn from_transport(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            ApiError::Timeout(timeout_ms)
        } else {
            ApiError::Network(error.to_string())
        }
    }

    /// HTTP status of an upstream error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { status, .. } => Some(*status),
            ApiError::NotAuthenticated => Some(401),
            _ => None,
        }
    }

    /// True when the backend says the target resource does not exist.
    ///
    /// Besides 404 this matches a 400 whose message reads "not found", which
    /// is how some backend routes report a missing record.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Upstream { status: 404, .. } => true,
            ApiError::Upstream {
                status: 400,
                message,
                details,
            } => {
                let mentions = |s: &str| s.to_lowercase().contains("not found");
                mentions(message) || details.as_deref().is_some_and(mentions)
            }
            _ => false,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation {
            field: e.field,
            message: e.message,
        }
    }
}
