//! Route definitions for the console HTTP API.
//!
//! All routes are organized by console area and mounted under `/api`.
//! Everything except health and the sign-in endpoints requires the bearer
//! token of the console session.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use erp_core::config::StorageMode;

use crate::handlers;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::{auth::require_session, logging::request_logging};
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let protected = Router::new()
        .merge(session_routes())
        .merge(screen_routes())
        .merge(dashboard_routes())
        .merge(product_routes())
        .merge(order_routes())
        .merge(partner_routes())
        .merge(finance_routes())
        .merge(operations_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let api_routes = Router::new()
        .merge(public_routes())
        .merge(protected);

    let mut router = Router::new().nest("/api", api_routes);
    if config.storage.mode == StorageMode::Local {
        router = router.nest_service("/files", ServeDir::new(&config.storage.local_root));
    }

    router
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.server.cors))
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Health and sign-in endpoints
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/magic-link", post(handlers::auth::magic_link))
        .route("/auth/session", post(handlers::auth::set_session))
        .route("/auth/refresh", post(handlers::auth::refresh))
}

/// Current user and logout
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Navigation menu and list screen state
fn screen_routes() -> Router<AppState> {
    Router::new()
        .route("/screens", get(handlers::screens::list_screens))
        .route(
            "/screens/{key}",
            get(handlers::screens::mount_screen).delete(handlers::screens::unmount_screen),
        )
        .route("/screens/{key}/params", patch(handlers::screens::update_params))
        .route(
            "/screens/{key}/sort/{column}",
            post(handlers::screens::toggle_sort),
        )
        .route(
            "/screens/{key}/filters/{column}",
            put(handlers::screens::set_filter),
        )
        .route("/screens/{key}/refetch", post(handlers::screens::refetch))
}

/// Dashboard summary
fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(handlers::dashboard::summary))
}

/// Product catalog
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product).patch(handlers::products::update_product),
        )
}

/// Orders
fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/orders/{id}",
            get(handlers::orders::get_order).patch(handlers::orders::update_order),
        )
}

/// Suppliers, customers and carriers
fn partner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/suppliers",
            get(handlers::partners::list_suppliers).post(handlers::partners::create_supplier),
        )
        .route("/suppliers/{id}", get(handlers::partners::get_supplier))
        .route(
            "/customers",
            get(handlers::partners::list_customers).post(handlers::partners::create_customer),
        )
        .route("/customers/{id}", get(handlers::partners::get_customer))
        .route(
            "/carriers",
            get(handlers::partners::list_carriers).post(handlers::partners::add_carrier),
        )
        .route(
            "/carriers/{id}",
            patch(handlers::partners::edit_carrier).delete(handlers::partners::delete_carrier),
        )
}

/// Bank accounts, cards, banks and card networks
fn finance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/finance/accounts",
            get(handlers::finance::list_accounts).post(handlers::finance::create_account),
        )
        .route(
            "/finance/cards",
            get(handlers::finance::list_cards).post(handlers::finance::create_card),
        )
        .route(
            "/finance/banks",
            get(handlers::finance::list_banks).post(handlers::finance::add_bank),
        )
        .route(
            "/finance/banks/{name}",
            axum::routing::delete(handlers::finance::remove_bank),
        )
        .route(
            "/finance/card-networks",
            get(handlers::finance::list_card_networks).post(handlers::finance::add_card_network),
        )
        .route(
            "/finance/card-networks/{name}",
            axum::routing::delete(handlers::finance::remove_card_network),
        )
}

/// Purchase-order tracker and the read-only lists
fn operations_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/purchase-orders",
            get(handlers::operations::list_purchase_orders),
        )
        .route(
            "/purchase-orders/{id}/tracking-code",
            put(handlers::operations::update_tracking_code),
        )
        .route("/inventory", get(handlers::operations::list_inventory))
        .route("/sales-returns", get(handlers::operations::list_sales_returns))
        .route("/complaints", get(handlers::operations::list_complaints))
        .route(
            "/marketplace-questions",
            get(handlers::operations::list_marketplace_questions),
        )
}
