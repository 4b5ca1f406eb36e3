//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::{ApiResponse, ComponentHealth, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let (backend_ok, storage_ok) =
        tokio::join!(state.backend.health_check(), state.storage.health_check());

    let backend_ok = backend_ok.unwrap_or_else(|e| {
        warn!(error = %e, "Backend health check failed");
        false
    });
    let storage_ok = storage_ok.unwrap_or_else(|e| {
        warn!(error = %e, "Storage health check failed");
        false
    });

    let status = if backend_ok && storage_ok { "ok" } else { "degraded" };
    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: ComponentHealth {
            provider: state.backend.backend_type().to_string(),
            healthy: backend_ok,
        },
        storage: ComponentHealth {
            provider: state.storage.provider_type().to_string(),
            healthy: storage_ok,
        },
        signed_in: state.session.is_signed_in(),
    }))
}
