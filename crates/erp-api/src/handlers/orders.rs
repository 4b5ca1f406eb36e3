//! Order handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use erp_core::types::{OrderId, PageResponse};
use erp_entity::order::{Order, OrderPatch};
use erp_service::{CreateOrderRequest, OrderDetail};

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<Order>>>> {
    let page = state.services.orders.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/orders
///
/// Creates the order and its items in one atomic step.
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<OrderDetail>>)> {
    let detail = state.services.orders.create_order(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(detail))))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<OrderId>,
) -> ApiResult<Json<ApiResponse<OrderDetail>>> {
    let detail = state.services.orders.order_detail(id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// PATCH /api/orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<OrderId>,
    Json(patch): Json<OrderPatch>,
) -> ApiResult<Json<ApiResponse<Order>>> {
    let order = state.services.orders.update_order(&auth, id, patch).await?;
    Ok(Json(ApiResponse::ok(order)))
}
