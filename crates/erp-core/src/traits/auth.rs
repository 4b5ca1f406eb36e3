//! Auth contract of the hosted backend.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::session::{Session, SessionUser};

/// Password and passwordless sign-in delegated to the hosted auth service.
#[async_trait]
pub trait AuthBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name.
    fn provider_type(&self) -> &str;

    /// Exchange e-mail and password for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Ask the service to e-mail a one-time sign-in link.
    async fn sign_in_with_otp(&self, email: &str, redirect_to: Option<&str>) -> AppResult<()>;

    /// Resolve the user an access token belongs to.
    async fn get_user(&self, access_token: &str) -> AppResult<SessionUser>;

    /// Exchange a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> AppResult<Session>;

    /// Revoke the session of `access_token`.
    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
}

/// Source of the bearer token attached to backend requests.
pub trait AccessTokenSource: Send + Sync + 'static {
    /// Current access token, if a session is active.
    fn access_token(&self) -> Option<String>;
}
