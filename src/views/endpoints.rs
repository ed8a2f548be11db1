//! Endpoint list view with test trigger.

use super::LoadState;
use crate::client::{ApiClient, ApiError};
use crate::model::{Endpoint, EndpointDraft, TestResult};
use std::collections::HashMap;

/// Pass/fail verdict of one "test now" run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub endpoint_id: String,
    pub passed: bool,
    pub result: TestResult,
}

impl TestOutcome {
    fn new(endpoint_id: &str, result: TestResult) -> Self {
        Self {
            endpoint_id: endpoint_id.to_string(),
            passed: result.success,
            result,
        }
    }

    /// One-line human summary, e.g. `PASS 200 in 87ms`.
    pub fn summary(&self) -> String {
        let verdict = if self.passed { "PASS" } else { "FAIL" };
        let status = self
            .result
            .status_code
            .map_or_else(|| "no status".to_string(), |s| s.to_string());
        let mut line = match self.result.response_time_ms {
            Some(ms) => format!("{} {} in {}ms", verdict, status, ms),
            None => format!("{} {}", verdict, status),
        };
        if let Some(error) = &self.result.error {
            line.push_str(&format!(": {}", error));
        }
        line
    }
}

/// Cached endpoint list plus the test results produced in this view.
pub struct EndpointsView {
    client: ApiClient,
    list: LoadState<Vec<Endpoint>>,
    results: HashMap<String, Vec<TestResult>>,
    banner: Option<String>,
}

impl EndpointsView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            list: LoadState::Idle,
            results: HashMap::new(),
            banner: None,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Endpoint>> {
        &self.list
    }

    /// Loaded endpoints; empty while loading or after a failed load.
    pub fn endpoints(&self) -> &[Endpoint] {
        self.list.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn endpoint(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints().iter().find(|e| e.id == id)
    }

    pub fn results_for(&self, endpoint_id: &str) -> &[TestResult] {
        self.results
            .get(endpoint_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Current error banner, from either a failed load or a failed action.
    pub fn error(&self) -> Option<&str> {
        self.banner.as_deref().or_else(|| self.list.error())
    }

    pub fn dismiss_error(&mut self) {
        self.banner = None;
        self.list.dismiss_error();
    }

    /// Reload the list. A failure leaves an empty list and an error banner.
    pub async fn refresh(&mut self) {
        self.list = LoadState::Loading;
        self.list = match self.client.list_endpoints().await {
            Ok(list) => LoadState::Loaded(list.records),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load endpoints");
                LoadState::Failed {
                    message: format!("Failed to load endpoints: {}", e),
                }
            }
        };
    }

    pub async fn create(&mut self, draft: &EndpointDraft) -> Result<Endpoint, ApiError> {
        let created = self.client.create_endpoint(draft).await;
        let endpoint = created.map_err(|e| self.surface("create endpoint", e))?;
        if let Some(list) = self.list.data_mut() {
            list.push(endpoint.clone());
        }
        Ok(endpoint)
    }

    pub async fn update(&mut self, id: &str, draft: &EndpointDraft) -> Result<Endpoint, ApiError> {
        let updated = self.client.update_endpoint(id, draft).await;
        let endpoint = updated.map_err(|e| self.surface("update endpoint", e))?;
        if let Some(list) = self.list.data_mut() {
            if let Some(slot) = list.iter_mut().find(|e| e.id == id) {
                *slot = endpoint.clone();
            }
        }
        Ok(endpoint)
    }

    /// Delete an endpoint and drop its cached test results.
    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        let deleted = self.client.delete_endpoint(id).await;
        deleted.map_err(|e| self.surface("delete endpoint", e))?;
        if let Some(list) = self.list.data_mut() {
            list.retain(|e| e.id != id);
        }
        self.results.remove(id);
        Ok(())
    }

    /// Fire one test and record its result.
    pub async fn run_test(&mut self, id: &str) -> Result<TestOutcome, ApiError> {
        let tested = self.client.test_endpoint(id).await;
        let result = tested.map_err(|e| self.surface("test endpoint", e))?;
        self.results
            .entry(id.to_string())
            .or_default()
            .push(result.clone());
        Ok(TestOutcome::new(id, result))
    }

    fn surface(&mut self, action: &str, error: ApiError) -> ApiError {
        tracing::warn!(action, error = %error, "Endpoint action failed");
        self.banner = Some(format!("Failed to {}: {}", action, error));
        error
    }
}
