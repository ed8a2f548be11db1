//! HTTP client for the Pingpad backend REST API.
//!
//! [`ApiClient`] owns a pooled `reqwest::Client` (cookie store enabled so
//! session cookies ride along) and the shared [`Session`]. Resource-specific
//! calls live in the submodules as inherent methods on `ApiClient`.

pub mod alarms;
pub mod api_keys;
pub mod auth;
pub mod endpoints;
pub mod error;

pub use alarms::{AckFailure, AckStatus, BatchAck};
pub use endpoints::HistoryWindow;
pub use error::ApiError;

use crate::config::BackendConfig;
use crate::session::Session;
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Client for the Pingpad backend.
///
/// Cheap to clone: clones share the connection pool, cookie jar and session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    session: Arc<Session>,
}

impl ApiClient {
    /// Build a client from backend configuration.
    pub fn new(config: &BackendConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(
            http,
            config.normalized_base_url(),
            timeout,
            session,
        ))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<Session>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            timeout,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Send a request with the session headers. Non-2xx responses are
    /// returned as-is; only transport failures become errors here.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let ctx = self.session.request_context();

        tracing::debug!(
            method = %method,
            path = %path,
            correlation_id = %ctx.correlation_id,
            "Sending backend request"
        );

        let mut request = self
            .http
            .request(method, &url)
            .headers(ctx.headers())
            .timeout(self.timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout_ms()))
    }

    /// Turn a response into its JSON body, or an [`ApiError`] for non-2xx.
    ///
    /// An empty 2xx body decodes to `Value::Null`.
    async fn read_json(&self, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let error = ApiError::from_response(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), error = %error, "Backend returned error");
            return Err(error);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response JSON: {}", e)))
    }

    pub(crate) async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let response = self.send::<Value>(Method::GET, path, query, None).await?;
        self.read_json(response).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let response = self.send(method, path, &[], body).await?;
        self.read_json(response).await
    }
}

/// `/api/` followed by `segments`, each percent-encoded so an id cannot
/// change the route. Empty and dot segments are rejected.
pub(crate) fn api_path(segments: &[&str]) -> Result<String, ApiError> {
    let invalid = |message: String| ApiError::Validation {
        field: "id".to_string(),
        message,
    };
    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(invalid(format!("'{}' is not a valid path segment", bad)));
    }

    let mut url = Url::parse("http://localhost/api").map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot build request path".to_string()))?
        .extend(segments);
    Ok(url.path().to_string())
}
