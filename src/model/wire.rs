//! Normalization boundary between backend JSON and typed records.
//!
//! Every defensive decision about loosely-typed backend payloads lives here:
//! ids that may be numbers or strings, timestamps in several encodings,
//! headers stored as text or as objects, missing `success` flags. Callers
//! receive fully-typed records and never inspect `serde_json::Value`.

use super::headers::Headers;
use super::time::{decode_timestamp, local_now};
use super::types::{
    is_success_status, Alarm, ApiKey, AuthGrant, Endpoint, HttpMethod, RecurringInterval,
    TestResult, User,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Counters describing how much of a payload needed fallback values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Records whose timestamp could not be decoded and were stamped "now"
    pub timestamp_fallbacks: usize,
    /// Entries that were not JSON objects and could not become records
    pub skipped_records: usize,
}

impl DataQuality {
    pub fn merge(&mut self, other: DataQuality) {
        self.timestamp_fallbacks += other.timestamp_fallbacks;
        self.skipped_records += other.skipped_records;
    }

    pub fn is_clean(&self) -> bool {
        self.timestamp_fallbacks == 0 && self.skipped_records == 0
    }
}

/// Normalized records plus the data-quality cost of producing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub quality: DataQuality,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            quality: DataQuality::default(),
        }
    }
}

/// Render an id of any JSON shape as a string. Null and missing become "".
pub fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn opt_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn opt_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn opt_status(value: &Value) -> Option<u16> {
    opt_u64(value).and_then(|v| u16::try_from(v).ok())
}

fn opt_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Decode headers stored as an object, as JSON-encoded text, or as
/// `Key: Value` lines.
pub fn decode_headers(value: &Value) -> Option<Headers> {
    match value {
        Value::Object(map) => Some(
            map.iter()
                .map(|(k, v)| (k.clone(), opt_string(v).unwrap_or_default()))
                .collect(),
        ),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('{') {
                if let Ok(nested @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
                    return decode_headers(&nested);
                }
            }
            Some(Headers::parse(s))
        }
        _ => None,
    }
}

fn timestamp_or_now(
    value: &Value,
    now: NaiveDateTime,
    quality: &mut DataQuality,
    record: &str,
    id: &str,
) -> NaiveDateTime {
    match decode_timestamp(value) {
        Some(ts) => ts,
        None => {
            quality.timestamp_fallbacks += 1;
            tracing::warn!(
                record = record,
                id = id,
                raw_timestamp = %value,
                "Unparseable timestamp, substituting current time"
            );
            now
        }
    }
}

fn normalize_list<W, T>(
    raw: &[Value],
    now: NaiveDateTime,
    record: &str,
    convert: impl Fn(W, NaiveDateTime, &mut DataQuality) -> T,
) -> Normalized<T>
where
    W: for<'de> Deserialize<'de>,
{
    let mut out = Normalized {
        records: Vec::with_capacity(raw.len()),
        quality: DataQuality::default(),
    };
    for value in raw {
        if !value.is_object() {
            out.quality.skipped_records += 1;
            tracing::warn!(record = record, raw = %value, "Skipping non-object entry");
            continue;
        }
        match serde_json::from_value::<W>(value.clone()) {
            Ok(wire) => {
                let item = convert(wire, now, &mut out.quality);
                out.records.push(item);
            }
            Err(e) => {
                out.quality.skipped_records += 1;
                tracing::warn!(record = record, error = %e, "Skipping undecodable entry");
            }
        }
    }
    out
}

/// Coerce a response body into a list of entries. Anything but an array is
/// treated as empty.
pub fn as_list(value: Value, record: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(record = record, raw = %other, "Expected a JSON array, using empty list");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Test results
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct WireTestResult {
    id: Value,
    endpoint_id: Value,
    status_code: Value,
    response_time: Value,
    response_body: Value,
    response_headers: Value,
    error: Value,
    success: Value,
    timestamp: Value,
}

fn convert_test_result(
    wire: WireTestResult,
    now: NaiveDateTime,
    quality: &mut DataQuality,
) -> TestResult {
    let id = id_string(&wire.id);
    let status_code = opt_status(&wire.status_code);
    let timestamp = timestamp_or_now(&wire.timestamp, now, quality, "test_result", &id);
    TestResult {
        endpoint_id: id_string(&wire.endpoint_id),
        status_code,
        response_time_ms: opt_u64(&wire.response_time),
        response_body: opt_string(&wire.response_body),
        response_headers: decode_headers(&wire.response_headers),
        error: opt_string(&wire.error).filter(|e| !e.is_empty()),
        success: opt_bool(&wire.success).unwrap_or_else(|| is_success_status(status_code)),
        timestamp,
        id,
    }
}

/// Normalize a single test result. Non-object payloads yield an empty
/// record stamped "now".
pub fn normalize_test_result(raw: &Value, now: NaiveDateTime) -> (TestResult, DataQuality) {
    let mut quality = DataQuality::default();
    let wire = serde_json::from_value::<WireTestResult>(raw.clone()).unwrap_or_default();
    let result = convert_test_result(wire, now, &mut quality);
    (result, quality)
}

/// Normalize a batch of test results.
pub fn normalize_test_results(raw: &[Value], now: NaiveDateTime) -> Normalized<TestResult> {
    normalize_list(raw, now, "test_result", convert_test_result)
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct WireEndpoint {
    id: Value,
    name: Value,
    url: Value,
    method: Value,
    headers: Value,
    body: Value,
    recurring_enabled: Value,
    recurring_interval: Value,
    created_at: Value,
    updated_at: Value,
}

fn convert_endpoint(wire: WireEndpoint, now: NaiveDateTime, quality: &mut DataQuality) -> Endpoint {
    let id = id_string(&wire.id);

    let method = match wire.method.as_str().map(str::parse::<HttpMethod>) {
        Some(Ok(method)) => method,
        Some(Err(e)) => {
            tracing::warn!(endpoint_id = %id, error = %e, "Unknown method, defaulting to GET");
            HttpMethod::Get
        }
        None => HttpMethod::Get,
    };

    let recurring_interval = wire
        .recurring_interval
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse::<RecurringInterval>().ok());
    let recurring_enabled =
        opt_bool(&wire.recurring_enabled).unwrap_or(recurring_interval.is_some());

    let created_at = if wire.created_at.is_null() {
        now
    } else {
        timestamp_or_now(&wire.created_at, now, quality, "endpoint", &id)
    };
    let updated_at = if wire.updated_at.is_null() {
        created_at
    } else {
        timestamp_or_now(&wire.updated_at, now, quality, "endpoint", &id)
    };

    Endpoint {
        name: opt_string(&wire.name).unwrap_or_default(),
        url: opt_string(&wire.url).unwrap_or_default(),
        method,
        headers: decode_headers(&wire.headers).unwrap_or_default(),
        body: opt_string(&wire.body).filter(|b| !b.is_empty()),
        recurring_enabled,
        recurring_interval,
        created_at,
        updated_at,
        id,
    }
}

pub fn normalize_endpoint(raw: &Value, now: NaiveDateTime) -> Endpoint {
    let wire = serde_json::from_value::<WireEndpoint>(raw.clone()).unwrap_or_default();
    convert_endpoint(wire, now, &mut DataQuality::default())
}

pub fn normalize_endpoints(raw: &[Value], now: NaiveDateTime) -> Normalized<Endpoint> {
    normalize_list(raw, now, "endpoint", convert_endpoint)
}

// ---------------------------------------------------------------------------
// Alarms
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct WireAlarm {
    test_result_id: Value,
    endpoint_id: Value,
    endpoint_name: Value,
    endpoint_url: Value,
    error: Value,
    status_code: Value,
    timestamp: Value,
}

fn convert_alarm(wire: WireAlarm, now: NaiveDateTime, quality: &mut DataQuality) -> Alarm {
    let test_result_id = id_string(&wire.test_result_id);
    let timestamp = timestamp_or_now(&wire.timestamp, now, quality, "alarm", &test_result_id);
    Alarm {
        endpoint_id: id_string(&wire.endpoint_id),
        endpoint_name: opt_string(&wire.endpoint_name).unwrap_or_default(),
        endpoint_url: opt_string(&wire.endpoint_url).unwrap_or_default(),
        error: opt_string(&wire.error).filter(|e| !e.is_empty()),
        status_code: opt_status(&wire.status_code),
        timestamp,
        test_result_id,
    }
}

pub fn normalize_alarms(raw: &[Value], now: NaiveDateTime) -> Normalized<Alarm> {
    normalize_list(raw, now, "alarm", convert_alarm)
}

// ---------------------------------------------------------------------------
// API keys, users, auth grants
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct WireApiKey {
    id: Value,
    name: Value,
    key_value: Value,
    created_at: Value,
    updated_at: Value,
}

fn convert_api_key(wire: WireApiKey, _now: NaiveDateTime, _quality: &mut DataQuality) -> ApiKey {
    ApiKey {
        id: id_string(&wire.id),
        name: opt_string(&wire.name).unwrap_or_default(),
        key_value: opt_string(&wire.key_value).unwrap_or_default(),
        created_at: decode_timestamp(&wire.created_at),
        updated_at: decode_timestamp(&wire.updated_at),
    }
}

pub fn normalize_api_key(raw: &Value) -> ApiKey {
    let wire = serde_json::from_value::<WireApiKey>(raw.clone()).unwrap_or_default();
    convert_api_key(wire, local_now(), &mut DataQuality::default())
}

pub fn normalize_api_keys(raw: &[Value], now: NaiveDateTime) -> Normalized<ApiKey> {
    normalize_list(raw, now, "api_key", convert_api_key)
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireUser {
    id: Value,
    email: Value,
    name: Value,
}

pub fn normalize_user(raw: &Value) -> User {
    let wire = serde_json::from_value::<WireUser>(raw.clone()).unwrap_or_default();
    User {
        id: id_string(&wire.id),
        email: opt_string(&wire.email).unwrap_or_default(),
        name: opt_string(&wire.name).unwrap_or_default(),
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireGrant {
    token: Value,
    #[serde(rename = "type")]
    token_type: Value,
    user: Value,
}

/// Extract the bearer token from a login response. `None` when absent.
pub fn normalize_grant(raw: &Value) -> Option<AuthGrant> {
    let wire = serde_json::from_value::<WireGrant>(raw.clone()).ok()?;
    let token = wire.token.as_str().filter(|t| !t.is_empty())?.to_string();
    Some(AuthGrant {
        token,
        token_type: wire
            .token_type
            .as_str()
            .unwrap_or("Bearer")
            .to_string(),
        user: wire.user.is_object().then(|| normalize_user(&wire.user)),
    })
}
