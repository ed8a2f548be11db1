//! Time bucketing of test results into chart points.

use super::config::{Granularity, MissingResponseTime};
use super::range::TimeRange;
use super::stats::{average_response_time, nearest_rank, success_percent};
use crate::model::TestResult;
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

/// One non-empty bucket of the response-time chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    /// Display label ("14:00", "Mar 09 14:00", "Mar 09")
    pub time: String,
    pub bucket_start: NaiveDateTime,
    /// Average response time in ms
    pub response_time: u64,
    pub p95: Option<u64>,
    pub p99: Option<u64>,
    pub requests: u64,
    pub errors: u64,
    pub success: u64,
    /// Whole-number percentage
    pub success_rate: u64,
}

/// Start of the bucket a timestamp falls into.
pub fn bucket_start(timestamp: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    let hour = match granularity {
        Granularity::Hourly => timestamp.hour(),
        Granularity::Daily => 0,
    };
    timestamp
        .date()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or(timestamp)
}

/// Display label for a bucket.
pub fn bucket_label(start: NaiveDateTime, range: TimeRange, granularity: Granularity) -> String {
    match (granularity, range) {
        (Granularity::Daily, _) => start.format("%b %d").to_string(),
        (Granularity::Hourly, TimeRange::Last24Hours) => start.format("%H:00").to_string(),
        (Granularity::Hourly, _) => start.format("%b %d %H:00").to_string(),
    }
}

/// Group results into buckets, ascending by bucket start. Empty buckets are
/// never produced.
pub fn build_points(
    results: &[&TestResult],
    range: TimeRange,
    granularity: Granularity,
    missing: MissingResponseTime,
) -> Vec<ChartDataPoint> {
    let mut buckets: BTreeMap<NaiveDateTime, Vec<&TestResult>> = BTreeMap::new();
    for &result in results {
        buckets
            .entry(bucket_start(result.timestamp, granularity))
            .or_default()
            .push(result);
    }

    buckets
        .into_iter()
        .map(|(start, entries)| {
            let requests = entries.len() as u64;
            let success = entries.iter().filter(|r| r.success).count() as u64;

            let mut timings: Vec<u64> = entries.iter().filter_map(|r| r.response_time_ms).collect();
            timings.sort_unstable();

            ChartDataPoint {
                time: bucket_label(start, range, granularity),
                bucket_start: start,
                response_time: average_response_time(&entries, missing),
                p95: nearest_rank(&timings, 95),
                p99: nearest_rank(&timings, 99),
                requests,
                errors: requests - success,
                success,
                success_rate: success_percent(success, requests),
            }
        })
        .collect()
}
