//! # erp-api
//!
//! HTTP surface of the ERP console, built on Axum.
//!
//! The routes under `/api` mirror the console's navigation: list screens
//! with their fetch state, the order form, the product form with image
//! upload, finance dialogs and the read-only operations lists.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
