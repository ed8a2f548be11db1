//! Endpoint repository and test trigger calls.

use super::{api_path, ApiClient, ApiError};
use crate::model::wire::{self, as_list};
use crate::model::{
    local_now, Endpoint, EndpointDraft, Headers, HttpMethod, Normalized, RecurringInterval,
    TestResult,
};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// How far back a history request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    Hours(u32),
    Days(u32),
}

impl HistoryWindow {
    fn query(&self) -> (&'static str, String) {
        match self {
            HistoryWindow::Hours(h) => ("hours", h.to_string()),
            HistoryWindow::Days(d) => ("days", d.to_string()),
        }
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        HistoryWindow::Hours(24)
    }
}

/// Body of create and update requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndpointPayload<'a> {
    name: &'a str,
    url: &'a str,
    method: HttpMethod,
    headers: &'a Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    recurring_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurring_interval: Option<RecurringInterval>,
}

impl<'a> From<&'a EndpointDraft> for EndpointPayload<'a> {
    fn from(draft: &'a EndpointDraft) -> Self {
        Self {
            name: draft.name.trim(),
            url: draft.url.trim(),
            method: draft.method,
            headers: &draft.headers,
            body: draft.body.as_deref().filter(|b| !b.trim().is_empty()),
            recurring_enabled: draft.recurring_interval.is_some(),
            recurring_interval: draft.recurring_interval,
        }
    }
}

impl ApiClient {
    /// `GET /api/endpoints`
    pub async fn list_endpoints(&self) -> Result<Normalized<Endpoint>, ApiError> {
        let raw = self.get_json("/api/endpoints", &[]).await?;
        let list = wire::normalize_endpoints(&as_list(raw, "endpoint"), local_now());
        tracing::debug!(count = list.records.len(), "Listed endpoints");
        Ok(list)
    }

    /// `GET /api/endpoints/{id}`
    pub async fn get_endpoint(&self, id: &str) -> Result<Endpoint, ApiError> {
        let raw = self.get_json(&api_path(&["endpoints", id])?, &[]).await?;
        Ok(wire::normalize_endpoint(&raw, local_now()))
    }

    /// `POST /api/endpoints`
    pub async fn create_endpoint(&self, draft: &EndpointDraft) -> Result<Endpoint, ApiError> {
        draft.validate()?;
        let payload = EndpointPayload::from(draft);
        let raw = self
            .send_json(Method::POST, "/api/endpoints", Some(&payload))
            .await?;
        let endpoint = wire::normalize_endpoint(&raw, local_now());
        tracing::info!(endpoint_id = %endpoint.id, name = %endpoint.name, "Created endpoint");
        Ok(endpoint)
    }

    /// `PUT /api/endpoints/{id}`
    pub async fn update_endpoint(
        &self,
        id: &str,
        draft: &EndpointDraft,
    ) -> Result<Endpoint, ApiError> {
        draft.validate()?;
        let payload = EndpointPayload::from(draft);
        let raw = self
            .send_json(Method::PUT, &api_path(&["endpoints", id])?, Some(&payload))
            .await?;
        let endpoint = wire::normalize_endpoint(&raw, local_now());
        tracing::info!(endpoint_id = %endpoint.id, "Updated endpoint");
        Ok(endpoint)
    }

    /// `DELETE /api/endpoints/{id}`. A 404 means it is already gone.
    pub async fn delete_endpoint(&self, id: &str) -> Result<(), ApiError> {
        let path = api_path(&["endpoints", id])?;
        match self
            .send_json::<Value>(Method::DELETE, &path, None)
            .await
        {
            Ok(_) => {
                tracing::info!(endpoint_id = %id, "Deleted endpoint");
                Ok(())
            }
            Err(ApiError::Upstream { status: 404, .. }) => {
                tracing::debug!(endpoint_id = %id, "Endpoint already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// `POST /api/endpoints/{id}/test`: run one test now.
    pub async fn test_endpoint(&self, id: &str) -> Result<TestResult, ApiError> {
        let raw = self
            .send_json::<Value>(Method::POST, &api_path(&["endpoints", id, "test"])?, None)
            .await?;
        if !raw.is_object() {
            return Err(ApiError::InvalidResponse(
                "test response is not a JSON object".to_string(),
            ));
        }
        let (result, _) = wire::normalize_test_result(&raw, local_now());
        tracing::info!(
            endpoint_id = %id,
            status = ?result.status_code,
            success = result.success,
            "Endpoint test finished"
        );
        Ok(result)
    }

    /// `GET /api/endpoints/{id}/analytics`: raw test-result history.
    ///
    /// Records are returned unnormalized so the aggregator can account for
    /// malformed entries itself.
    pub async fn endpoint_history(
        &self,
        id: &str,
        window: HistoryWindow,
    ) -> Result<Vec<Value>, ApiError> {
        let raw = self
            .get_json(&api_path(&["endpoints", id, "analytics"])?, &[window.query()])
            .await?;
        Ok(as_list(raw, "test result"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_sets_recurring_enabled_from_interval() {
        let mut draft = EndpointDraft::new(" api ", "https://example.com", HttpMethod::Post);
        draft.recurring_interval = Some(RecurringInterval::FiveMinutes);
        draft.headers = Headers::parse("Accept: application/json\nX-Token: a:b");
        draft.body = Some("{}".to_string());

        let json = serde_json::to_value(EndpointPayload::from(&draft)).unwrap();
        assert_eq!(json["name"], "api");
        assert_eq!(json["method"], "POST");
        assert_eq!(json["recurringEnabled"], true);
        assert_eq!(json["recurringInterval"], "5m");
        assert_eq!(json["headers"]["X-Token"], "a:b");
        assert_eq!(json["body"], "{}");
    }

    #[test]
    fn test_payload_omits_blank_body_and_interval() {
        let mut draft = EndpointDraft::new("api", "https://example.com", HttpMethod::Get);
        draft.body = Some("   ".to_string());

        let json = serde_json::to_value(EndpointPayload::from(&draft)).unwrap();
        assert!(json.get("body").is_none());
        assert!(json.get("recurringInterval").is_none());
        assert_eq!(json["recurringEnabled"], false);
    }

    #[test]
    fn test_history_window_query() {
        assert_eq!(HistoryWindow::Hours(168).query(), ("hours", "168".to_string()));
        assert_eq!(HistoryWindow::Days(30).query(), ("days", "30".to_string()));
        assert_eq!(HistoryWindow::default(), HistoryWindow::Hours(24));
    }
}
