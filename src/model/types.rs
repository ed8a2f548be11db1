//! Typed records the rest of the crate works with.
//!
//! These are produced only by the normalization functions in
//! [`crate::model::wire`]; nothing else reads raw backend JSON.

use super::headers::Headers;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// HTTP method of a configured endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(format!("Invalid HTTP method: {}", s)),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval at which the backend re-runs a recurring endpoint test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecurringInterval {
    #[serde(rename = "30s")]
    ThirtySeconds,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    TwentyFourHours,
}

impl RecurringInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringInterval::ThirtySeconds => "30s",
            RecurringInterval::FiveMinutes => "5m",
            RecurringInterval::OneHour => "1h",
            RecurringInterval::TwentyFourHours => "24h",
        }
    }

    pub fn as_duration(&self) -> Duration {
        match self {
            RecurringInterval::ThirtySeconds => Duration::from_secs(30),
            RecurringInterval::FiveMinutes => Duration::from_secs(5 * 60),
            RecurringInterval::OneHour => Duration::from_secs(60 * 60),
            RecurringInterval::TwentyFourHours => Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl FromStr for RecurringInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "30s" => Ok(RecurringInterval::ThirtySeconds),
            "5m" => Ok(RecurringInterval::FiveMinutes),
            "1h" => Ok(RecurringInterval::OneHour),
            "24h" => Ok(RecurringInterval::TwentyFourHours),
            _ => Err(format!(
                "Invalid recurring interval: {}. Use: 30s, 5m, 1h, 24h",
                s
            )),
        }
    }
}

impl fmt::Display for RecurringInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-configured HTTP target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub recurring_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<RecurringInterval>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-level validation failure for a record about to be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for '{field}': {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// User input for creating or updating an endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointDraft {
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<String>,
    pub recurring_interval: Option<RecurringInterval>,
}

impl EndpointDraft {
    pub fn new(name: impl Into<String>, url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    /// Pre-fill a draft from an existing endpoint (edit flow).
    pub fn from_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            name: endpoint.name.clone(),
            url: endpoint.url.clone(),
            method: endpoint.method,
            headers: endpoint.headers.clone(),
            body: endpoint.body.clone(),
            recurring_interval: endpoint
                .recurring_interval
                .filter(|_| endpoint.recurring_enabled),
        }
    }

    /// Reject drafts the backend would refuse anyway.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "name cannot be empty"));
        }
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ValidationError::new("url", "URL cannot be empty"));
        }
        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            Ok(parsed) => Err(ValidationError::new(
                "url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            )),
            Err(e) => Err(ValidationError::new("url", e.to_string())),
        }
    }
}

/// One execution record of an endpoint test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    pub endpoint_id: String,
    pub status_code: Option<u16>,
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Headers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
    pub timestamp: NaiveDateTime,
}

/// Success as derived from a status code alone.
pub fn is_success_status(status_code: Option<u16>) -> bool {
    matches!(status_code, Some(code) if (200..300).contains(&code))
}

/// A failed test result awaiting acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub test_result_id: String,
    pub endpoint_id: String,
    pub endpoint_name: String,
    pub endpoint_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub timestamp: NaiveDateTime,
}

/// A stored third-party API key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub key_value: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl ApiKey {
    /// Key value with everything but the first and last four characters hidden.
    pub fn masked_value(&self) -> String {
        mask_secret(&self.key_value)
    }
}

const MASK: &str = "••••••••";

/// Mask a secret for display. Short secrets are hidden entirely.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return MASK.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, MASK, tail)
}

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Token issued by the login endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: String,
    pub token_type: String,
    pub user: Option<User>,
}
