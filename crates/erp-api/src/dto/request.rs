//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use erp_core::types::{Session, SessionUser, UserId};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// E-mail address.
    #[validate(email(message = "A valid e-mail is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Magic link request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MagicLinkRequest {
    /// Address the sign-in link is sent to.
    #[validate(email(message = "A valid e-mail is required"))]
    pub email: String,
}

/// Tokens obtained by following a magic link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetSessionRequest {
    /// Access token.
    #[validate(length(min = 1, message = "Access token is required"))]
    pub access_token: String,
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
    /// Access token expiry, when known.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SetSessionRequest {
    /// Session to hand to the auth service, whose user is resolved there.
    pub fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at,
            user: SessionUser {
                id: UserId::from_uuid(uuid::Uuid::nil()),
                email: None,
            },
        }
    }
}

/// A lookup entry identified by its name (banks, card networks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRequest {
    /// Entry name.
    pub name: String,
}

/// New tracking code of a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingCodeRequest {
    /// Carrier tracking code.
    pub tracking_code: String,
}

/// New pattern for one filter column of a list screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Substring to match; empty clears the filter.
    #[serde(default)]
    pub pattern: String,
}
