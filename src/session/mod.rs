//! Session state shared by every backend call.
//!
//! A [`Session`] holds the bearer token and the per-session correlation ID.
//! Callers never read those globals directly; they take a [`RequestContext`]
//! snapshot and hand it to the HTTP layer.

use crate::logging::generate_correlation_id;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Header carrying the per-session correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    correlation_id: Option<String>,
}

/// Process-wide session: token plus correlation ID.
///
/// The correlation ID is created on first use, reused until [`Session::logout`],
/// and then created afresh on the next request.
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that starts out authenticated.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.write().token = Some(token.into());
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Current correlation ID, minting one if the session has none yet.
    pub fn correlation_id(&self) -> String {
        if let Some(id) = self.read().correlation_id.clone() {
            return id;
        }
        let mut state = self.write();
        state
            .correlation_id
            .get_or_insert_with(|| {
                let id = generate_correlation_id();
                tracing::debug!(correlation_id = %id, "Started correlation session");
                id
            })
            .clone()
    }

    /// Drop the token and the correlation ID.
    pub fn logout(&self) {
        let mut state = self.write();
        state.token = None;
        state.correlation_id = None;
    }

    /// Snapshot of what the next request should carry.
    pub fn request_context(&self) -> RequestContext {
        let correlation_id = self.correlation_id();
        RequestContext {
            correlation_id,
            token: self.token(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Per-request view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub correlation_id: String,
    pub token: Option<String>,
}

impl RequestContext {
    /// Standard headers for a backend call.
    ///
    /// Values that cannot be encoded as header values are left out.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&self.correlation_id) {
            headers.insert(CORRELATION_ID_HEADER, value);
        }
        if let Some(token) = &self.token {
            if let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}
