//! Selectable analytics time ranges.

use super::config::{AnalyticsConfig, Granularity};
use crate::client::HistoryWindow;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look-back window of an analytics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::Last24Hours,
        TimeRange::Last7Days,
        TimeRange::Last30Days,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last24Hours => "24h",
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
        }
    }

    pub fn hours(&self) -> u32 {
        match self {
            TimeRange::Last24Hours => 24,
            TimeRange::Last7Days => 7 * 24,
            TimeRange::Last30Days => 30 * 24,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(i64::from(self.hours()))
    }

    /// History request covering this range.
    pub fn history_window(&self) -> HistoryWindow {
        HistoryWindow::Hours(self.hours())
    }

    pub fn granularity(&self, config: &AnalyticsConfig) -> Granularity {
        match self {
            TimeRange::Last24Hours => Granularity::Hourly,
            TimeRange::Last7Days => config.seven_day_granularity,
            TimeRange::Last30Days => Granularity::Daily,
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24h" => Ok(TimeRange::Last24Hours),
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            _ => Err(format!("Invalid time range: {}. Use: 24h, 7d, 30d", s)),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
