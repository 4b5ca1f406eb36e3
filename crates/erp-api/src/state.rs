//! Shared application state passed to all Axum handlers.

use std::sync::Arc;

use erp_auth::SessionContext;
use erp_core::config::AppConfig;
use erp_core::traits::{ObjectStorage, QueryBackend};
use erp_service::ConsoleServices;

/// Application state shared across all request handlers.
///
/// Cloning is cheap: every field is an `Arc` or a handle around one.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Query backend, used directly by the health check.
    pub backend: Arc<dyn QueryBackend>,
    /// Product image storage.
    pub storage: Arc<dyn ObjectStorage>,
    /// The operator's sign-in state.
    pub session: SessionContext,
    /// Domain services.
    pub services: ConsoleServices,
}

impl AppState {
    /// Builds the state, creating the services over `backend` and `storage`.
    pub fn new(
        config: AppConfig,
        backend: Arc<dyn QueryBackend>,
        storage: Arc<dyn ObjectStorage>,
        session: SessionContext,
    ) -> Self {
        let services = ConsoleServices::new(Arc::clone(&backend), Arc::clone(&storage), &config);
        Self {
            config: Arc::new(config),
            backend,
            storage,
            session,
            services,
        }
    }
}
