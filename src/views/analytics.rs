//! Per-endpoint analytics view.

use super::LoadState;
use crate::analytics::{aggregate_raw, AnalyticsConfig, AnalyticsReport, TimeRange};
use crate::client::ApiClient;
use crate::model::local_now;

pub struct AnalyticsView {
    client: ApiClient,
    config: AnalyticsConfig,
    range: TimeRange,
    report: LoadState<AnalyticsReport>,
}

impl AnalyticsView {
    pub fn new(client: ApiClient, config: AnalyticsConfig) -> Self {
        Self {
            client,
            config,
            range: TimeRange::default(),
            report: LoadState::Idle,
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Switch range. The current report stays until the next [`Self::load`].
    pub fn set_range(&mut self, range: TimeRange) {
        self.range = range;
    }

    pub fn state(&self) -> &LoadState<AnalyticsReport> {
        &self.report
    }

    pub fn dismiss_error(&mut self) {
        if self.report.error().is_some() {
            self.report = LoadState::Idle;
        }
    }

    /// Fetch history for the current range and aggregate it.
    pub async fn load(&mut self, endpoint_id: &str) -> &LoadState<AnalyticsReport> {
        self.report = LoadState::Loading;
        let fetched = self
            .client
            .endpoint_history(endpoint_id, self.range.history_window())
            .await;

        self.report = match fetched {
            Ok(raw) => {
                let report = aggregate_raw(&raw, self.range, local_now(), &self.config);
                if !report.data_quality.is_clean() {
                    tracing::warn!(
                        endpoint_id = %endpoint_id,
                        timestamp_fallbacks = report.data_quality.timestamp_fallbacks,
                        skipped_records = report.data_quality.skipped_records,
                        "Analytics built from imperfect data"
                    );
                }
                LoadState::Loaded(report)
            }
            Err(e) => {
                tracing::warn!(endpoint_id = %endpoint_id, error = %e, "Failed to load analytics");
                LoadState::Failed {
                    message: format!("Failed to load analytics: {}", e),
                }
            }
        };
        &self.report
    }
}
