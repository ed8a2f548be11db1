//! Whole-range summary scalars.

use super::config::MissingResponseTime;
use super::stats::{average_response_time, success_percent_one_decimal};
use crate::model::TestResult;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Whole milliseconds
    pub average_response_time: u64,
    pub total_requests: u64,
    pub total_errors: u64,
    /// Percentage with one decimal
    pub success_rate: f64,
}

pub fn summarize(results: &[&TestResult], missing: MissingResponseTime) -> Summary {
    let total_requests = results.len() as u64;
    let successes = results.iter().filter(|r| r.success).count() as u64;

    Summary {
        average_response_time: average_response_time(results, missing),
        total_requests,
        total_errors: total_requests - successes,
        success_rate: success_percent_one_decimal(successes, total_requests),
    }
}
