//! Configuration for periodic polling.

use serde::{Deserialize, Serialize};

/// What a tick does while the previous run has not finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Start another run regardless
    #[default]
    Allow,
    /// Drop the tick
    Skip,
}

/// `[polling]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between alarm feed refreshes
    pub alarm_interval_seconds: u64,
    pub overlap: OverlapPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            alarm_interval_seconds: 10,
            overlap: OverlapPolicy::Allow,
        }
    }
}
