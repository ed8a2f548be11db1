//! Aggregation policy configuration

use serde::{Deserialize, Serialize};

/// Bucket size used for a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Hourly,
    Daily,
}

/// How results without a response time enter the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingResponseTime {
    /// Contribute 0 ms and count toward the sample size
    #[default]
    CountAsZero,
    /// Leave the entry out of the average entirely
    Exclude,
}

/// `[analytics]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Bucket size for the 7d range (24h is always hourly, 30d always daily)
    pub seven_day_granularity: Granularity,
    pub missing_response_time: MissingResponseTime,
}
