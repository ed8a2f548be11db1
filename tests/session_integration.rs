//! Integration tests for authentication and the headers every request carries.

mod common;

use common::{anonymous_client, authed_client, TEST_TOKEN};
use pingpad::client::ApiError;
use pingpad::session::CORRELATION_ID_HEADER;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn mount_empty_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/endpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bearer_token_sent_when_authenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/endpoints"))
        .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    authed_client(&server).list_endpoints().await.unwrap();
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    mount_empty_endpoints(&server).await;

    anonymous_client(&server).list_endpoints().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(header_value(&requests[0], "Authorization").is_none());
    assert!(header_value(&requests[0], CORRELATION_ID_HEADER).is_some());
}

#[tokio::test]
async fn test_correlation_id_stable_until_logout() {
    let server = MockServer::start().await;
    mount_empty_endpoints(&server).await;

    let client = authed_client(&server);
    client.list_endpoints().await.unwrap();
    client.list_endpoints().await.unwrap();
    client.logout();
    client.list_endpoints().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let ids: Vec<String> = requests
        .iter()
        .map(|r| header_value(r, CORRELATION_ID_HEADER).unwrap())
        .collect();
    assert_eq!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);

    // Logout also dropped the token
    assert!(header_value(&requests[1], "Authorization").is_some());
    assert!(header_value(&requests[2], "Authorization").is_none());
}

#[tokio::test]
async fn test_login_stores_token_for_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token",
            "type": "Bearer",
            "user": {"id": 3, "email": "ada@example.com", "name": "Ada"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("Authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "email": "ada@example.com", "name": "Ada"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let grant = client.login(" ada@example.com ", "hunter22").await.unwrap();
    assert_eq!(grant.token, "fresh-token");
    assert_eq!(grant.user.as_ref().map(|u| u.id.as_str()), Some("3"));
    assert!(client.session().is_authenticated());

    let me = client.me().await.unwrap();
    assert_eq!(me.name, "Ada");
}

#[tokio::test]
async fn test_login_rejected_leaves_session_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let err = client.login("ada@example.com", "wrong").await.unwrap_err();
    assert_eq!(err, ApiError::NotAuthenticated);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_login_response_without_token_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login-as-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "Bearer"})))
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let err = client.login_as_test().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_register_validates_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let err = client
        .register("ada@example.com", "Ada", "12345")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "password"));

    let err = client.register("", "Ada", "123456").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "email"));
}

#[tokio::test]
async fn test_change_password_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/user/me/password"))
        .and(body_json(json!({"currentPassword": "old-secret", "newPassword": "new-secret"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    authed_client(&server)
        .change_password("old-secret", "new-secret")
        .await
        .unwrap();
}
