//! Analytics command handler

use super::output::{format_json, format_report};
use super::AnalyticsArgs;
use crate::analytics::AnalyticsConfig;
use crate::client::ApiClient;
use crate::views::{AnalyticsView, LoadState};

/// Handle `pingpad analytics <endpoint-id>`
pub async fn handle_analytics(
    args: &AnalyticsArgs,
    client: ApiClient,
    config: AnalyticsConfig,
) -> anyhow::Result<String> {
    let mut view = AnalyticsView::new(client, config);
    view.set_range(args.range);

    match view.load(&args.endpoint_id).await {
        LoadState::Loaded(report) if args.json => format_json(report),
        LoadState::Loaded(report) => Ok(format_report(report)),
        LoadState::Failed { message } => anyhow::bail!("{}", message),
        LoadState::Idle | LoadState::Loading => anyhow::bail!("analytics did not load"),
    }
}
