//! Integer statistics shared by buckets and the summary.
//!
//! All rounding is half-up and done in integer arithmetic so results are
//! exact for any input size. Sums are widened to `u128`; a result that does
//! not fit back into `u64` saturates.

use super::config::MissingResponseTime;
use crate::model::TestResult;

/// `numerator / denominator` rounded half-up. Zero when `denominator` is zero.
pub fn div_round_half_up(numerator: u64, denominator: u64) -> u64 {
    div_round_half_up_wide(u128::from(numerator), denominator)
}

fn div_round_half_up_wide(numerator: u128, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let denominator = u128::from(denominator);
    let quotient = (numerator.saturating_mul(2).saturating_add(denominator)) / (denominator * 2);
    u64::try_from(quotient).unwrap_or(u64::MAX)
}

/// Success percentage rounded half-up to a whole number.
pub fn success_percent(successes: u64, total: u64) -> u64 {
    div_round_half_up_wide(u128::from(successes) * 100, total)
}

/// Success percentage rounded half-up to one decimal.
pub fn success_percent_one_decimal(successes: u64, total: u64) -> f64 {
    div_round_half_up_wide(u128::from(successes) * 1000, total) as f64 / 10.0
}

/// Average response time in whole milliseconds.
pub fn average_response_time(results: &[&TestResult], policy: MissingResponseTime) -> u64 {
    let defined: Vec<u64> = results.iter().filter_map(|r| r.response_time_ms).collect();
    let sum: u128 = defined.iter().map(|&ms| u128::from(ms)).sum();
    let sample_size = match policy {
        MissingResponseTime::CountAsZero => results.len(),
        MissingResponseTime::Exclude => defined.len(),
    };
    div_round_half_up_wide(sum, sample_size as u64)
}

/// Nearest-rank percentile over an ascending slice. `None` for an empty slice.
pub fn nearest_rank(sorted: &[u64], percentile: u64) -> Option<u64> {
    if sorted.is_empty() {
        return None;
    }
    let count = sorted.len() as u64;
    let rank = (percentile * count).div_ceil(100).max(1);
    sorted.get((rank - 1) as usize).copied()
}
