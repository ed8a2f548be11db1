//! Alarm feed view: polled list, selection and acknowledgement.

use super::LoadState;
use crate::client::{AckStatus, ApiClient, ApiError, BatchAck};
use crate::model::Alarm;
use crate::poller::PollJob;
use async_trait::async_trait;
use dashmap::DashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct AlarmsState {
    list: LoadState<Vec<Alarm>>,
    banner: Option<String>,
    /// Generation of the load whose result is currently shown
    applied: u64,
}

/// Active alarms, shared between the owner and its poll task.
pub struct AlarmsView {
    client: ApiClient,
    state: RwLock<AlarmsState>,
    selection: DashSet<String>,
    generation: AtomicU64,
    mounted: AtomicBool,
}

impl AlarmsView {
    pub fn new(client: ApiClient) -> Arc<Self> {
        Arc::new(Self {
            client,
            state: RwLock::new(AlarmsState::default()),
            selection: DashSet::new(),
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
        })
    }

    /// Refetch the feed.
    ///
    /// A response is dropped when a newer load has already been applied or
    /// the view has been torn down.
    pub async fn reload(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        {
            let mut state = self.state.write().await;
            if state.list.data().is_none() {
                state.list = LoadState::Loading;
            }
        }

        let fetched = self.client.list_alarms().await;

        if !self.is_mounted() {
            tracing::debug!(generation, "Alarm view torn down, discarding response");
            return;
        }

        let mut state = self.state.write().await;
        if generation < state.applied {
            tracing::debug!(
                generation,
                applied = state.applied,
                "Discarding stale alarm response"
            );
            return;
        }
        state.applied = generation;

        match fetched {
            Ok(list) => {
                let alarms = list.records;
                self.selection
                    .retain(|id| alarms.iter().any(|a| &a.test_result_id == id));
                tracing::debug!(count = alarms.len(), "Alarm feed refreshed");
                state.list = LoadState::Loaded(alarms);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load alarms");
                state.list = LoadState::Failed {
                    message: format!("Failed to load alarms: {}", e),
                };
            }
        }
    }

    /// Snapshot of the active alarms (empty unless loaded).
    pub async fn alarms(&self) -> Vec<Alarm> {
        self.state
            .read()
            .await
            .list
            .data()
            .cloned()
            .unwrap_or_default()
    }

    /// Badge count.
    pub async fn unread_count(&self) -> usize {
        self.state.read().await.list.data().map_or(0, Vec::len)
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.list.is_loading()
    }

    pub async fn error(&self) -> Option<String> {
        let state = self.state.read().await;
        state
            .banner
            .clone()
            .or_else(|| state.list.error().map(str::to_string))
    }

    pub async fn dismiss_error(&self) {
        let mut state = self.state.write().await;
        state.banner = None;
        state.list.dismiss_error();
    }

    pub fn select(&self, test_result_id: &str) {
        self.selection.insert(test_result_id.to_string());
    }

    pub fn deselect(&self, test_result_id: &str) {
        self.selection.remove(test_result_id);
    }

    pub async fn select_all(&self) {
        for alarm in self.alarms().await {
            self.selection.insert(alarm.test_result_id);
        }
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    /// Selected ids in ascending order.
    pub fn selected(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selection.iter().map(|id| id.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Acknowledge one alarm, then reload.
    pub async fn acknowledge(&self, test_result_id: &str) -> Result<AckStatus, ApiError> {
        let outcome = self.client.acknowledge_alarm(test_result_id).await;
        match &outcome {
            Ok(_) => {
                self.selection.remove(test_result_id);
            }
            Err(e) => self.set_banner(format!("Failed to acknowledge alarm: {}", e)).await,
        }
        self.reload().await;
        outcome
    }

    /// Acknowledge every selected alarm in parallel, then reload.
    ///
    /// The reload happens even when some calls fail. Failed ids stay
    /// selected and their alarms may remain in the feed.
    pub async fn acknowledge_selected(&self) -> BatchAck {
        let ids = self.selected();
        let outcome = self.client.acknowledge_alarms(&ids).await;

        for id in outcome.acknowledged.iter().chain(&outcome.already_resolved) {
            self.selection.remove(id);
        }
        if !outcome.is_complete() {
            self.set_banner(format!(
                "Failed to acknowledge {} of {} alarms",
                outcome.failed.len(),
                ids.len()
            ))
            .await;
        }

        self.reload().await;
        outcome
    }

    /// Stop accepting responses. Requests in flight are left to finish.
    pub fn teardown(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    async fn set_banner(&self, message: String) {
        self.state.write().await.banner = Some(message);
    }
}

#[async_trait]
impl PollJob for AlarmsView {
    fn name(&self) -> &str {
        "alarms"
    }

    async fn run(&self) {
        self.reload().await;
    }
}
