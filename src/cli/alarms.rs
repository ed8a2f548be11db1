//! Alarms command handlers

use super::output::{format_alarms_table, format_json};
use super::{AlarmsAckArgs, AlarmsCommands, AlarmsWatchArgs, JsonArgs};
use crate::client::{AckStatus, ApiClient, BatchAck};
use crate::config::PollingConfig;
use crate::poller::{PollJob, Poller};
use crate::views::AlarmsView;
use async_trait::async_trait;
use colored::Colorize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Summarize a batch acknowledgement for the terminal.
pub fn format_batch_ack(outcome: &BatchAck) -> String {
    let mut lines = Vec::new();
    if !outcome.acknowledged.is_empty() {
        lines.push(format!(
            "{} Acknowledged: {}",
            "✓".green(),
            outcome.acknowledged.join(", ")
        ));
    }
    if !outcome.already_resolved.is_empty() {
        lines.push(format!(
            "{} Already resolved: {}",
            "•".dimmed(),
            outcome.already_resolved.join(", ")
        ));
    }
    for failure in &outcome.failed {
        lines.push(format!(
            "{} {}: {}",
            "✗".red(),
            failure.test_result_id,
            failure.error
        ));
    }
    if lines.is_empty() {
        lines.push("Nothing to acknowledge.".to_string());
    }
    lines.join("\n")
}

/// Handle `pingpad alarms ...`. `watch` prints as it goes and returns no output.
pub async fn handle_alarms(
    cmd: AlarmsCommands,
    client: ApiClient,
    polling: PollingConfig,
) -> anyhow::Result<String> {
    match cmd {
        AlarmsCommands::List(JsonArgs { json }) => {
            let view = AlarmsView::new(client);
            view.reload().await;
            if let Some(error) = view.error().await {
                anyhow::bail!("{}", error);
            }
            let alarms = view.alarms().await;
            if json {
                format_json(&alarms)
            } else {
                Ok(format_alarms_table(&alarms))
            }
        }
        AlarmsCommands::Count => Ok(client.alarm_count().await?.to_string()),
        AlarmsCommands::Ack(args) => handle_ack(&args, client).await,
        AlarmsCommands::Watch(args) => {
            handle_watch(&args, client, polling).await?;
            Ok(String::new())
        }
    }
}

async fn handle_ack(args: &AlarmsAckArgs, client: ApiClient) -> anyhow::Result<String> {
    let view = AlarmsView::new(client);

    if let [id] = args.ids.as_slice() {
        let status = view.acknowledge(id).await?;
        return Ok(match status {
            AckStatus::Acknowledged => format!("✓ Acknowledged alarm {}", id),
            AckStatus::AlreadyResolved => format!("Alarm {} was already resolved", id),
        });
    }

    if args.all {
        view.reload().await;
        if let Some(error) = view.error().await {
            anyhow::bail!("{}", error);
        }
        view.select_all().await;
    } else {
        for id in &args.ids {
            view.select(id);
        }
    }

    let outcome = view.acknowledge_selected().await;
    let summary = format_batch_ack(&outcome);
    if !outcome.is_complete() {
        anyhow::bail!(
            "{}\n{} alarm(s) still active after reload",
            summary,
            view.unread_count().await
        );
    }
    Ok(summary)
}

/// Reload-and-render job for `alarms watch`.
struct AlarmWatch {
    view: Arc<AlarmsView>,
}

#[async_trait]
impl PollJob for AlarmWatch {
    fn name(&self) -> &str {
        "alarm-watch"
    }

    async fn run(&self) {
        self.view.reload().await;
        if !self.view.is_mounted() {
            return;
        }
        let rendered = match self.view.error().await {
            Some(error) => format!("{} {}", "✗".red(), error),
            None => format_alarms_table(&self.view.alarms().await),
        };
        println!(
            "{} {} active alarm(s)\n{}",
            chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
            self.view.unread_count().await,
            rendered
        );
    }
}

/// Handle `pingpad alarms watch`: poll until Ctrl-C.
pub async fn handle_watch(
    args: &AlarmsWatchArgs,
    client: ApiClient,
    mut polling: PollingConfig,
) -> anyhow::Result<()> {
    if let Some(interval) = args.interval {
        anyhow::ensure!(interval > 0, "interval must be non-zero");
        polling.alarm_interval_seconds = interval;
    }

    let view = AlarmsView::new(client);
    let job = Arc::new(AlarmWatch {
        view: Arc::clone(&view),
    });
    let handle = Poller::for_alarms(&polling).start(job, CancellationToken::new());

    tokio::signal::ctrl_c().await?;
    view.teardown();
    handle.shutdown().await;
    Ok(())
}
