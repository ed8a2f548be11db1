//! API-key vault calls.

use super::{api_path, ApiClient, ApiError};
use crate::model::wire::{self, as_list};
use crate::model::{local_now, ApiKey, Normalized, ValidationError};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiKeyPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_value: Option<&'a str>,
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{} cannot be empty", field)));
    }
    Ok(())
}

impl ApiClient {
    /// `GET /api/api-keys`
    pub async fn list_api_keys(&self) -> Result<Normalized<ApiKey>, ApiError> {
        let raw = self.get_json("/api/api-keys", &[]).await?;
        Ok(wire::normalize_api_keys(&as_list(raw, "api key"), local_now()))
    }

    /// `POST /api/api-keys`
    pub async fn create_api_key(&self, name: &str, key_value: &str) -> Result<ApiKey, ApiError> {
        require("name", name)?;
        require("keyValue", key_value)?;
        let payload = ApiKeyPayload {
            name: name.trim(),
            key_value: Some(key_value),
        };
        let raw = self
            .send_json(Method::POST, "/api/api-keys", Some(&payload))
            .await?;
        let key = wire::normalize_api_key(&raw);
        tracing::info!(api_key_id = %key.id, name = %key.name, "Stored API key");
        Ok(key)
    }

    /// `PUT /api/api-keys/{id}`. The stored value is kept when `key_value` is `None`.
    pub async fn update_api_key(
        &self,
        id: &str,
        name: &str,
        key_value: Option<&str>,
    ) -> Result<ApiKey, ApiError> {
        require("name", name)?;
        let payload = ApiKeyPayload {
            name: name.trim(),
            key_value: key_value.filter(|v| !v.trim().is_empty()),
        };
        let raw = self
            .send_json(Method::PUT, &api_path(&["api-keys", id])?, Some(&payload))
            .await?;
        Ok(wire::normalize_api_key(&raw))
    }

    /// `DELETE /api/api-keys/{id}`. A 404 means it is already gone.
    pub async fn delete_api_key(&self, id: &str) -> Result<(), ApiError> {
        let path = api_path(&["api-keys", id])?;
        match self
            .send_json::<Value>(Method::DELETE, &path, None)
            .await
        {
            Ok(_) | Err(ApiError::Upstream { status: 404, .. }) => {
                tracing::info!(api_key_id = %id, "Deleted API key");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_omits_missing_key_value() {
        let payload = ApiKeyPayload {
            name: "stripe",
            key_value: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"name": "stripe"}));
    }

    #[test]
    fn test_payload_uses_camel_case() {
        let payload = ApiKeyPayload {
            name: "stripe",
            key_value: Some("sk_live_123"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["keyValue"], "sk_live_123");
    }

    #[test]
    fn test_require_rejects_blank() {
        assert_eq!(require("name", "  ").unwrap_err().field, "name");
        assert!(require("name", "x").is_ok());
    }
}
