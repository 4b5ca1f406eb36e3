//! Authenticated session issued by the hosted auth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User identifier.
    pub id: UserId,
    /// E-mail address, when the account has one.
    #[serde(default)]
    pub email: Option<String>,
}

/// An access/refresh token pair and its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent with every backend request.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// Access token expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// The user the tokens belong to.
    pub user: SessionUser,
}

impl Session {
    /// Whether the access token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}
