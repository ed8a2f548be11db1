//! Status-code distribution.

use crate::model::TestResult;
use serde::Serialize;
use std::collections::HashMap;

/// Range class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Other,
}

impl StatusClass {
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Other,
        }
    }

    /// Chart color (hex).
    pub fn color(&self) -> &'static str {
        match self {
            StatusClass::Success => "#10b981",
            StatusClass::Redirect => "#3b82f6",
            StatusClass::ClientError => "#f59e0b",
            StatusClass::ServerError | StatusClass::Other => "#ef4444",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::Redirect => "3xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
            StatusClass::Other => "other",
        }
    }
}

/// Count of one exact status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status_code: u16,
    pub count: u64,
    pub class: StatusClass,
    pub color: &'static str,
}

/// Tally results by exact status code, most frequent first (ties by code).
/// Results without a status code are not counted.
pub fn build_distribution(results: &[&TestResult]) -> Vec<StatusCount> {
    let mut counts: HashMap<u16, u64> = HashMap::new();
    for code in results.iter().filter_map(|r| r.status_code) {
        *counts.entry(code).or_default() += 1;
    }

    let mut distribution: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status_code, count)| {
            let class = StatusClass::from_code(status_code);
            StatusCount {
                status_code,
                count,
                class,
                color: class.color(),
            }
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.status_code.cmp(&b.status_code)));
    distribution
}
