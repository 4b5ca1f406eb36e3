//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use erp_core::types::{Session, SessionUser};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A session as returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token used by `POST /api/auth/refresh`.
    pub refresh_token: String,
    /// Access token expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// The signed-in user.
    pub user: SessionUser,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_at: session.expires_at,
            user: session.user,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Number of rows a delete removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedResponse {
    /// Rows removed.
    pub removed: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency answered, `"degraded"` otherwise.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Query backend in use and whether it answered.
    pub backend: ComponentHealth,
    /// Object storage in use and whether it answered.
    pub storage: ComponentHealth,
    /// Whether the console holds a session.
    pub signed_in: bool,
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Provider name.
    pub provider: String,
    /// Whether it answered the health check.
    pub healthy: bool,
}
