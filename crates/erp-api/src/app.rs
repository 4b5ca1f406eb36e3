//! Application builder: wires backends, services and the router into a
//! running server.

use std::sync::Arc;

use axum::Router;
use tracing::{error, info};

use erp_auth::{SessionContext, build_auth_backend};
use erp_core::config::AppConfig;
use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::AccessTokenSource;
use erp_database::connect_backend;
use erp_storage::build_storage;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the application state from configuration.
///
/// The session is created first: the query backend and the storage API
/// send its access token with every request.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    // ── Step 1: Auth ─────────────────────────────────────────────
    let auth_backend = build_auth_backend(&config.backend, &config.auth).await?;
    let session = SessionContext::new(auth_backend, &config.auth);
    let tokens: Arc<dyn AccessTokenSource> = Arc::new(session.clone());

    // ── Step 2: Query backend ────────────────────────────────────
    let backend = connect_backend(&config.backend, Some(Arc::clone(&tokens))).await?;

    // ── Step 3: Object storage ───────────────────────────────────
    let storage = build_storage(&config.storage, &config.backend, Some(tokens)).await?;

    // ── Step 4: Services ─────────────────────────────────────────
    Ok(AppState::new(config, backend, storage, session))
}

/// Runs the console server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting ERP console server...");
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = build_state(config).await?;
    let session = state.session.clone();
    session.start(None).await;

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("ERP console listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")));

    session.shutdown();
    info!("ERP console stopped");
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
