//! Client for the hosted auth service (`/auth/v1`).

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use erp_core::error::{AppError, ErrorKind};
use erp_core::result::AppResult;
use erp_core::traits::AuthBackend;
use erp_core::types::{Session, SessionUser, UserId};
use erp_database::HostedClient;

/// [`AuthBackend`] talking to the hosted service's auth endpoints.
#[derive(Debug, Clone)]
pub struct RestAuthClient {
    client: HostedClient,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for SessionUser {
    fn from(body: UserBody) -> Self {
        Self {
            id: UserId::from_uuid(body.id),
            email: body.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserBody,
}

impl TokenBody {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

impl RestAuthClient {
    /// Create a client sharing the backend's base URL and anon key.
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }

    fn token_url(&self, grant_type: &str) -> AppResult<Url> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    async fn exchange(&self, grant_type: &str, body: serde_json::Value) -> AppResult<Session> {
        let request = self
            .client
            .http()
            .post(self.token_url(grant_type)?)
            .json(&body);
        let response = self
            .client
            .send(self.client.authorize_anonymous(request))
            .await
            .map_err(auth_error)?;
        let body: TokenBody = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Unexpected token response from auth service",
                e,
            )
        })?;
        Ok(body.into_session(Utc::now()))
    }
}

/// Rejected credentials come back as plain 400s.
fn auth_error(mut err: AppError) -> AppError {
    if matches!(err.kind, ErrorKind::Database | ErrorKind::NotFound) {
        err.kind = ErrorKind::Authentication;
    }
    err
}

#[async_trait]
impl AuthBackend for RestAuthClient {
    fn provider_type(&self) -> &str {
        "rest"
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let session = self
            .exchange("password", json!({ "email": email, "password": password }))
            .await?;
        info!(user_id = %session.user.id, "Signed in with password");
        Ok(session)
    }

    async fn sign_in_with_otp(&self, email: &str, redirect_to: Option<&str>) -> AppResult<()> {
        let mut url = self.client.endpoint("auth/v1/otp")?;
        if let Some(redirect_to) = redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        }
        let request = self
            .client
            .http()
            .post(url)
            .json(&json!({ "email": email, "create_user": true }));
        self.client
            .send(self.client.authorize_anonymous(request))
            .await
            .map_err(auth_error)?;
        info!(email, "Magic link requested");
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AppResult<SessionUser> {
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self.client.authorize_with(self.client.http().get(url), access_token);
        let response = self.client.send(request).await.map_err(auth_error)?;
        let body: UserBody = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Unexpected user response from auth service",
                e,
            )
        })?;
        Ok(body.into())
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<Session> {
        let session = self
            .exchange("refresh_token", json!({ "refresh_token": refresh_token }))
            .await?;
        debug!(user_id = %session.user.id, "Session refreshed");
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let url = self.client.endpoint("auth/v1/logout")?;
        let request = self
            .client
            .authorize_with(self.client.http().post(url), access_token);
        self.client.send(request).await.map_err(auth_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration as StdDuration;

    const USER_ID: &str = "6f1d0c1e-3d4b-4d8e-9b7a-2b9a1f3c5d70";

    fn client(server: &MockServer) -> RestAuthClient {
        RestAuthClient::new(
            HostedClient::with_base_url(&server.base_url(), "anon", StdDuration::from_secs(5), None)
                .expect("client"),
        )
    }

    #[tokio::test]
    async fn test_password_sign_in() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/token")
                    .query_param("grant_type", "password")
                    .header("apikey", "anon")
                    .json_body(json!({"email": "ops@example.com", "password": "pw"}));
                then.status(200).json_body(json!({
                    "access_token": "at",
                    "refresh_token": "rt",
                    "expires_in": 3600,
                    "expires_at": 1_900_000_000,
                    "token_type": "bearer",
                    "user": {"id": USER_ID, "email": "ops@example.com"}
                }));
            })
            .await;

        let session = client(&server)
            .sign_in_with_password("ops@example.com", "pw")
            .await
            .expect("sign in");
        mock.assert_async().await;
        assert_eq!(session.access_token, "at");
        assert_eq!(session.refresh_token, "rt");
        assert_eq!(session.expires_at.map(|t| t.timestamp()), Some(1_900_000_000));
        assert_eq!(session.user.id.to_string(), USER_ID);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_authentication_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/token");
                then.status(400).json_body(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                }));
            })
            .await;

        let err = client(&server)
            .sign_in_with_password("ops@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_magic_link_and_user_lookup() {
        let server = MockServer::start_async().await;
        let otp = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/otp")
                    .query_param("redirect_to", "http://localhost:3000/")
                    .json_body(json!({"email": "ops@example.com", "create_user": true}));
                then.status(200).json_body(json!({}));
            })
            .await;
        let user = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/auth/v1/user")
                    .header("authorization", "Bearer at");
                then.status(200)
                    .json_body(json!({"id": USER_ID, "email": "ops@example.com"}));
            })
            .await;

        let auth = client(&server);
        auth.sign_in_with_otp("ops@example.com", Some("http://localhost:3000/"))
            .await
            .expect("otp");
        let found = auth.get_user("at").await.expect("user");
        otp.assert_async().await;
        user.assert_async().await;
        assert_eq!(found.email.as_deref(), Some("ops@example.com"));
    }

    #[tokio::test]
    async fn test_sign_out_sends_user_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/logout")
                    .header("authorization", "Bearer at");
                then.status(204);
            })
            .await;
        client(&server).sign_out("at").await.expect("sign out");
        mock.assert_async().await;
    }
}
