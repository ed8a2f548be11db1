//! Alarm feed calls.

use super::{api_path, ApiClient, ApiError};
use crate::model::wire::{self, as_list};
use crate::model::{local_now, Alarm, Normalized};
use futures::future::join_all;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Result of acknowledging one alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Acknowledged,
    /// The alarm was already gone (acknowledged elsewhere, or deleted)
    AlreadyResolved,
}

/// One failed acknowledgement in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckFailure {
    pub test_result_id: String,
    pub error: ApiError,
}

/// Outcome of acknowledging several alarms at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchAck {
    pub acknowledged: Vec<String>,
    pub already_resolved: Vec<String>,
    pub failed: Vec<AckFailure>,
}

impl BatchAck {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ApiClient {
    /// `GET /api/alarms`: active (unacknowledged) alarms.
    pub async fn list_alarms(&self) -> Result<Normalized<Alarm>, ApiError> {
        let raw = self.get_json("/api/alarms", &[]).await?;
        Ok(wire::normalize_alarms(&as_list(raw, "alarm"), local_now()))
    }

    /// `GET /api/alarms/count`
    pub async fn alarm_count(&self) -> Result<u64, ApiError> {
        let raw = self.get_json("/api/alarms/count", &[]).await?;
        let count = match &raw {
            Value::Number(n) => n.as_u64(),
            Value::Object(map) => map.get("count").and_then(Value::as_u64),
            _ => None,
        };
        count.ok_or_else(|| ApiError::InvalidResponse(format!("unexpected alarm count: {}", raw)))
    }

    /// `POST /api/alarms/{testResultId}/acknowledge`
    ///
    /// Acknowledging an alarm that no longer exists is not an error.
    pub async fn acknowledge_alarm(&self, test_result_id: &str) -> Result<AckStatus, ApiError> {
        let path = api_path(&["alarms", test_result_id, "acknowledge"])?;
        match self.send_json::<Value>(Method::POST, &path, None).await {
            Ok(_) => {
                tracing::info!(test_result_id = %test_result_id, "Acknowledged alarm");
                Ok(AckStatus::Acknowledged)
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(test_result_id = %test_result_id, "Alarm already resolved");
                Ok(AckStatus::AlreadyResolved)
            }
            Err(e) => {
                tracing::warn!(test_result_id = %test_result_id, error = %e, "Failed to acknowledge alarm");
                Err(e)
            }
        }
    }

    /// Acknowledge several alarms concurrently.
    ///
    /// Every call is dispatched; individual failures are collected rather
    /// than aborting the batch.
    pub async fn acknowledge_alarms(&self, test_result_ids: &[String]) -> BatchAck {
        let calls = test_result_ids.iter().map(|id| async move {
            (id.clone(), self.acknowledge_alarm(id).await)
        });

        let mut outcome = BatchAck::default();
        for (id, result) in join_all(calls).await {
            match result {
                Ok(AckStatus::Acknowledged) => outcome.acknowledged.push(id),
                Ok(AckStatus::AlreadyResolved) => outcome.already_resolved.push(id),
                Err(error) => outcome.failed.push(AckFailure {
                    test_result_id: id,
                    error,
                }),
            }
        }
        outcome
    }
}
