//! Auth state change events.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// A change of the console's sign-in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthEvent {
    /// The stored session was loaded at startup (or none was found).
    InitialSession {
        /// The user of the restored session.
        user_id: Option<UserId>,
    },
    /// A user signed in.
    SignedIn {
        /// The user ID.
        user_id: UserId,
        /// The e-mail used to sign in.
        email: Option<String>,
    },
    /// The session was replaced by a refreshed one.
    TokenRefreshed {
        /// The user ID.
        user_id: UserId,
    },
    /// A magic link was requested.
    MagicLinkRequested {
        /// Recipient address.
        email: String,
    },
    /// The session ended.
    SignedOut,
}
