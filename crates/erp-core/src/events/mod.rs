//! Events emitted by the auth session context.

pub mod auth;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use auth::AuthEvent;

/// An [`AuthEvent`] with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStateChange {
    /// Unique event ID.
    pub id: Uuid,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
    /// The change.
    pub event: AuthEvent,
}

impl AuthStateChange {
    /// Wrap an event with a fresh ID and the current time.
    pub fn new(event: AuthEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}
