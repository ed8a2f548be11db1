//! Timestamp decoding for the encodings the backend emits.
//!
//! The backend serializes local date-times either as ISO-like strings without
//! an offset or as `[year, month, day, hour, minute, second, nanos]` arrays
//! (trailing zero components may be omitted). Both decode to the same local
//! wall-clock `NaiveDateTime`; offset-less strings are never shifted.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Decode a JSON timestamp value. Returns `None` for anything unrecognized.
pub fn decode_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Array(parts) => {
            let parts: Option<Vec<i64>> = parts.iter().map(Value::as_i64).collect();
            from_parts(&parts?)
        }
        Value::Number(n) => n.as_i64().and_then(from_epoch_millis),
        _ => None,
    }
}

/// Parse an ISO-like timestamp string.
///
/// Strings carrying an explicit offset (`Z`, `+02:00`) are converted to the
/// local wall clock; strings without one are taken as local already.
pub fn parse_timestamp_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Build a timestamp from `[year, month, day, hour?, minute?, second?, nanos?]`.
pub fn from_parts(parts: &[i64]) -> Option<NaiveDateTime> {
    if parts.len() < 3 {
        return None;
    }
    let component = |i: usize| -> Option<u32> {
        parts
            .get(i)
            .map_or(Some(0), |v| u32::try_from(*v).ok())
    };

    let year = i32::try_from(parts[0]).ok()?;
    let date = NaiveDate::from_ymd_opt(year, component(1)?, component(2)?)?;
    date.and_hms_nano_opt(component(3)?, component(4)?, component(5)?, component(6)?)
}

/// Epoch milliseconds of 0001-01-01T00:00:00Z and 9999-12-31T23:59:59.999Z.
const EPOCH_MILLIS_RANGE: std::ops::RangeInclusive<i64> = -62_135_596_800_000..=253_402_300_799_999;

fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    // Outside four-digit years the local offset can push past NaiveDateTime's limits
    if !EPOCH_MILLIS_RANGE.contains(&millis) {
        return None;
    }
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.naive_local())
}
