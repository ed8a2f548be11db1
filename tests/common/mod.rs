//! Shared test utilities for Pingpad integration tests.
//!
//! Provides a mock backend, clients wired to it, and JSON fixtures shaped
//! the way the backend actually emits them.

#![allow(dead_code)]

use chrono::{Duration, NaiveDateTime};
use pingpad::client::ApiClient;
use pingpad::session::Session;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test";

/// Client pointing at the mock server with no token.
pub fn anonymous_client(server: &MockServer) -> ApiClient {
    ApiClient::with_client(
        reqwest::Client::new(),
        server.uri(),
        std::time::Duration::from_secs(5),
        Arc::new(Session::new()),
    )
}

/// Client pointing at the mock server, already authenticated.
pub fn authed_client(server: &MockServer) -> ApiClient {
    ApiClient::with_client(
        reqwest::Client::new(),
        server.uri(),
        std::time::Duration::from_secs(5),
        Arc::new(Session::with_token(TEST_TOKEN)),
    )
}

/// Render a timestamp in the tuple encoding.
pub fn tuple(ts: NaiveDateTime) -> Value {
    use chrono::{Datelike, Timelike};
    json!([
        ts.year(),
        ts.month(),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second()
    ])
}

/// Render a timestamp in the offset-less string encoding.
pub fn iso(ts: NaiveDateTime) -> Value {
    json!(ts.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Endpoint as stored by the backend: numeric id, headers as text.
pub fn endpoint_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": format!("https://{}.example.com/health", name),
        "method": "GET",
        "headers": "Accept: application/json\nX-Trace: a:b",
        "body": null,
        "recurringEnabled": true,
        "recurringInterval": "5m",
        "createdAt": [2024, 6, 1, 9, 30, 0],
        "updatedAt": "2024-06-01T10:00:00"
    })
}

/// A single test result `minutes_ago` before `now`.
pub fn result_json(
    id: u64,
    status: Option<u16>,
    response_time: Option<u64>,
    now: NaiveDateTime,
    minutes_ago: i64,
) -> Value {
    json!({
        "id": id,
        "endpointId": 1,
        "statusCode": status,
        "responseTime": response_time,
        "success": status.map(|s| (200..300).contains(&s)),
        "timestamp": tuple(now - Duration::minutes(minutes_ago)),
    })
}

/// An active alarm for a failed test result.
pub fn alarm_json(test_result_id: u64, endpoint_name: &str) -> Value {
    json!({
        "testResultId": test_result_id,
        "endpointId": 1,
        "endpointName": endpoint_name,
        "endpointUrl": format!("https://{}.example.com", endpoint_name),
        "error": "Connection refused",
        "statusCode": null,
        "timestamp": "2024-06-01T12:00:00"
    })
}
