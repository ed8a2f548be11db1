//! Analytics aggregation
//!
//! Turns a flat list of test results into chart-ready series for one time
//! range: non-empty time buckets, a status-code distribution, and summary
//! scalars. Aggregation is pure and never fails; malformed input degrades
//! to defaults inside [`crate::model::wire`] and is reported through
//! [`DataQuality`].
//!
//! # Example
//!
//! ```
//! use pingpad::analytics::{aggregate_raw, AnalyticsConfig, TimeRange};
//! use pingpad::model::local_now;
//! use serde_json::json;
//!
//! let raw = vec![
//!     json!({"id": 1, "endpointId": "e", "statusCode": 200, "responseTime": 120, "timestamp": "not-a-date"}),
//! ];
//! let report = aggregate_raw(&raw, TimeRange::Last24Hours, local_now(), &AnalyticsConfig::default());
//! assert_eq!(report.summary.total_requests, 1);
//! assert_eq!(report.data_quality.timestamp_fallbacks, 1);
//! ```

pub mod bucket;
pub mod config;
pub mod distribution;
pub mod range;
pub mod stats;
pub mod summary;

pub use bucket::ChartDataPoint;
pub use config::{AnalyticsConfig, Granularity, MissingResponseTime};
pub use distribution::{StatusClass, StatusCount};
pub use range::TimeRange;
pub use summary::Summary;

use crate::model::wire::normalize_test_results;
use crate::model::{DataQuality, TestResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

/// Everything a dashboard needs to draw one endpoint's analytics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub range: TimeRange,
    pub granularity: Granularity,
    pub generated_at: NaiveDateTime,
    pub points: Vec<ChartDataPoint>,
    pub status_distribution: Vec<StatusCount>,
    pub summary: Summary,
    pub data_quality: DataQuality,
}

impl AnalyticsReport {
    pub fn is_empty(&self) -> bool {
        self.summary.total_requests == 0
    }
}

/// Aggregate typed results for `range`, as seen at `now`.
///
/// Only results with `timestamp >= now - range` are included; there is no
/// upper bound.
pub fn aggregate(
    results: &[TestResult],
    range: TimeRange,
    now: NaiveDateTime,
    config: &AnalyticsConfig,
) -> AnalyticsReport {
    let cutoff = now - range.duration();
    let in_window: Vec<&TestResult> = results.iter().filter(|r| r.timestamp >= cutoff).collect();
    let granularity = range.granularity(config);

    tracing::debug!(
        range = %range,
        total = results.len(),
        in_window = in_window.len(),
        "Aggregating test results"
    );

    AnalyticsReport {
        range,
        granularity,
        generated_at: now,
        points: bucket::build_points(
            &in_window,
            range,
            granularity,
            config.missing_response_time,
        ),
        status_distribution: distribution::build_distribution(&in_window),
        summary: summary::summarize(&in_window, config.missing_response_time),
        data_quality: DataQuality::default(),
    }
}

/// Normalize raw backend records, then [`aggregate`] them.
pub fn aggregate_raw(
    raw: &[Value],
    range: TimeRange,
    now: NaiveDateTime,
    config: &AnalyticsConfig,
) -> AnalyticsReport {
    let normalized = normalize_test_results(raw, now);
    let mut report = aggregate(&normalized.records, range, now, config);
    report.data_quality = normalized.quality;
    report
}

#[cfg(test)]
mod tests;
