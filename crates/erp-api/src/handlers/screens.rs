//! Navigation menu and the list screens' fetch state.
//!
//! `GET /screens/{key}` mounts a list screen (first fetch) or returns the
//! state of the already mounted one. Parameter changes are applied to the
//! mounted fetcher and answer with the state after the resulting fetch.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::types::query::ensure_identifier;
use erp_core::types::{FetchParams, FetchParamsPatch};
use erp_service::screens::ScreenFetcher;
use erp_service::{FetchState, ScreenDefinition};

use crate::dto::request::FilterRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

type ScreenState = Json<ApiResponse<FetchState<Value>>>;

/// GET /api/screens
pub async fn list_screens(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Json<ApiResponse<Vec<ScreenDefinition>>> {
    Json(ApiResponse::ok(state.services.screens.screens().to_vec()))
}

/// GET /api/screens/{key}
pub async fn mount_screen(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<ScreenState> {
    let fetcher = state.services.screens.mount(&key).await?;
    Ok(Json(ApiResponse::ok(fetcher.snapshot())))
}

/// PATCH /api/screens/{key}/params
pub async fn update_params(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(key): Path<String>,
    Json(mut patch): Json<FetchParamsPatch>,
) -> ApiResult<ScreenState> {
    let fetcher = mounted(&state, &key).await?;
    if let Some(Some(column)) = &patch.sort_column {
        ensure_identifier(column)?;
    }
    if let Some(filters) = &patch.filters {
        filters.keys().try_for_each(|column| ensure_identifier(column))?;
    }
    let max = state.services.screens.max_page_size();
    patch.page_size = patch.page_size.map(|size| size.min(max));

    fetcher.update_fetch_params(patch).await?;
    Ok(Json(ApiResponse::ok(fetcher.snapshot())))
}

/// POST /api/screens/{key}/sort/{column}
///
/// Sorts by `column`, flipping the direction when it is already the sort
/// column.
pub async fn toggle_sort(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((key, column)): Path<(String, String)>,
) -> ApiResult<ScreenState> {
    ensure_identifier(&column)?;
    let fetcher = mounted(&state, &key).await?;
    fetcher
        .update_fetch_params(move |current: &FetchParams| {
            FetchParamsPatch::toggle_sort(current, &column)
        })
        .await?;
    Ok(Json(ApiResponse::ok(fetcher.snapshot())))
}

/// PUT /api/screens/{key}/filters/{column}
///
/// Sets one filter pattern, keeping the others, and goes back to the
/// first page.
pub async fn set_filter(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((key, column)): Path<(String, String)>,
    Json(req): Json<FilterRequest>,
) -> ApiResult<ScreenState> {
    ensure_identifier(&column)?;
    let fetcher = mounted(&state, &key).await?;
    fetcher
        .update_fetch_params(move |current: &FetchParams| {
            FetchParamsPatch::filter_changed(current, column, req.pattern)
        })
        .await?;
    Ok(Json(ApiResponse::ok(fetcher.snapshot())))
}

/// POST /api/screens/{key}/refetch
pub async fn refetch(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<ScreenState> {
    let fetcher = mounted(&state, &key).await?;
    fetcher.refetch().await;
    Ok(Json(ApiResponse::ok(fetcher.snapshot())))
}

/// DELETE /api/screens/{key}
pub async fn unmount_screen(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    if !state.services.screens.unmount(&key).await {
        return Err(AppError::not_found(format!("Screen {key} is not mounted")).into());
    }
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Screen {key} unmounted"
    )))))
}

async fn mounted(state: &AppState, key: &str) -> AppResult<Arc<ScreenFetcher>> {
    state
        .services
        .screens
        .fetcher(key)
        .await
        .ok_or_else(|| AppError::not_found(format!("Screen {key} is not mounted")))
}
