//! Purchase-order tracker and the read-only operations lists.

use axum::Json;
use axum::extract::{Path, State};

use erp_core::types::{PageResponse, PurchaseOrderId};
use erp_entity::operations::{
    Complaint, InventoryMovement, MarketplaceQuestion, PurchaseOrder, SalesReturn,
};

use crate::dto::request::TrackingCodeRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/purchase-orders
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<PurchaseOrder>>>> {
    let orders = state.services.tracker.list().await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// PUT /api/purchase-orders/{id}/tracking-code
pub async fn update_tracking_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<PurchaseOrderId>,
    Json(req): Json<TrackingCodeRequest>,
) -> ApiResult<Json<ApiResponse<PurchaseOrder>>> {
    let order = state
        .services
        .tracker
        .update_tracking_code(&auth, id, &req.tracking_code)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// GET /api/inventory
pub async fn list_inventory(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<InventoryMovement>>>> {
    let page = state.services.inventory.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/sales-returns
pub async fn list_sales_returns(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<SalesReturn>>>> {
    let page = state.services.sales_returns.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/complaints
pub async fn list_complaints(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<Complaint>>>> {
    let page = state.services.complaints.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/marketplace-questions
pub async fn list_marketplace_questions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<MarketplaceQuestion>>>> {
    let page = state.services.marketplace_questions.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}
