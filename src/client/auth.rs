//! Session acquisition and profile calls.

use super::{ApiClient, ApiError};
use crate::model::wire;
use crate::model::{AuthGrant, User, ValidationError};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Shortest password the backend accepts at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ProfileRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

fn check_password(field: &str, password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            field,
            format!("password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

impl ApiClient {
    /// `POST /api/auth/login`. Stores the issued token in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let body = LoginRequest {
            email: email.trim(),
            password,
        };
        let raw = self
            .send_json(Method::POST, "/api/auth/login", Some(&body))
            .await?;
        self.accept_grant(&raw)
    }

    /// `POST /api/auth/register`. Stores the issued token in the session.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        if email.trim().is_empty() {
            return Err(ValidationError::new("email", "email is required").into());
        }
        if name.trim().is_empty() {
            return Err(ValidationError::new("name", "name is required").into());
        }
        check_password("password", password)?;

        let body = RegisterRequest {
            email: email.trim(),
            name: name.trim(),
            password,
        };
        let raw = self
            .send_json(Method::POST, "/api/auth/register", Some(&body))
            .await?;
        self.accept_grant(&raw)
    }

    /// `POST /api/auth/login-as-test`: shared demo account.
    pub async fn login_as_test(&self) -> Result<AuthGrant, ApiError> {
        let raw = self
            .send_json::<Value>(Method::POST, "/api/auth/login-as-test", None)
            .await?;
        self.accept_grant(&raw)
    }

    /// Forget the token and correlation ID. Tokens are stateless on the
    /// backend, so no request is made.
    pub fn logout(&self) {
        self.session().logout();
        tracing::info!("Logged out");
    }

    /// `GET /api/user/me`
    pub async fn me(&self) -> Result<User, ApiError> {
        let raw = self.get_json("/api/user/me", &[]).await?;
        Ok(wire::normalize_user(&raw))
    }

    /// `PUT /api/user/me`
    pub async fn update_profile(&self, name: &str) -> Result<User, ApiError> {
        if name.trim().is_empty() {
            return Err(ValidationError::new("name", "name is required").into());
        }
        let body = ProfileRequest { name: name.trim() };
        let raw = self
            .send_json(Method::PUT, "/api/user/me", Some(&body))
            .await?;
        Ok(wire::normalize_user(&raw))
    }

    /// `PUT /api/user/me/password`
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ApiError> {
        check_password("newPassword", new)?;
        let body = PasswordRequest {
            current_password: current,
            new_password: new,
        };
        self.send_json(Method::PUT, "/api/user/me/password", Some(&body))
            .await?;
        tracing::info!("Password changed");
        Ok(())
    }

    fn accept_grant(&self, raw: &Value) -> Result<AuthGrant, ApiError> {
        let grant = wire::normalize_grant(raw)
            .ok_or_else(|| ApiError::InvalidResponse("response carries no token".to_string()))?;
        self.session().set_token(grant.token.clone());
        tracing::info!(
            user = grant.user.as_ref().map(|u| u.email.as_str()).unwrap_or("unknown"),
            "Authenticated"
        );
        Ok(grant)
    }
}
