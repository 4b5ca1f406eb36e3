//! Request context carrying the signed-in user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use erp_core::types::{SessionUser, UserId};

/// Who is acting, passed into every mutating service call so changes
/// can be attributed in the logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The signed-in user.
    pub user: SessionUser,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user: SessionUser) -> Self {
        Self {
            user,
            request_time: Utc::now(),
        }
    }

    /// The signed-in user's ID.
    pub fn user_id(&self) -> UserId {
        self.user.id
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> RequestContext {
    RequestContext::new(SessionUser {
        id: UserId::from_uuid(uuid::Uuid::new_v4()),
        email: Some("ops@example.com".into()),
    })
}
