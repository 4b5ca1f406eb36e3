//! # erp-auth
//!
//! Sign-in for the ERP console. Credentials are checked by the hosted
//! auth service; this crate keeps the resulting session.
//!
//! ## Modules
//!
//! - `session`: [`SessionContext`], the single owner of the sign-in state
//! - `client`: REST client for the hosted auth endpoints
//! - `memory`: in-process auth backend for demo mode and tests
//! - `jwt`: access token claims, local verification and signing

pub mod client;
pub mod jwt;
pub mod memory;
pub mod session;

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use erp_core::config::{AuthConfig, BackendConfig, BackendMode};
use erp_core::result::AppResult;
use erp_core::traits::AuthBackend;
use erp_database::HostedClient;

pub use client::RestAuthClient;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use memory::MemoryAuthBackend;
pub use session::SessionContext;

/// Signing secret of the in-process backend when none is configured.
const DEMO_SECRET: &str = "erp-console-demo-secret";

/// Build the auth backend matching the query backend's mode.
///
/// The hosted auth service is used with the REST and Postgres backends;
/// the in-process backend goes with the in-process store, seeded with the
/// configured demo account.
pub async fn build_auth_backend(
    backend: &BackendConfig,
    auth: &AuthConfig,
) -> AppResult<Arc<dyn AuthBackend>> {
    let provider: Arc<dyn AuthBackend> = match backend.mode {
        BackendMode::Rest | BackendMode::Postgres => {
            Arc::new(RestAuthClient::new(HostedClient::new(backend, None)?))
        }
        BackendMode::Memory => {
            let secret = auth.jwt_secret.as_deref().unwrap_or(DEMO_SECRET);
            let memory = MemoryAuthBackend::new(secret, Duration::hours(1));
            if let (Some(email), Some(password)) = (&auth.demo_email, &auth.demo_password) {
                memory.add_user(email, password).await;
                info!(email = %email, "Demo account created");
            }
            Arc::new(memory)
        }
    };
    info!(provider = provider.provider_type(), "Auth backend ready");
    Ok(provider)
}
