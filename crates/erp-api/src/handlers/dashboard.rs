//! Dashboard handler.

use axum::Json;
use axum::extract::State;

use erp_service::DashboardSummary;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dashboard
pub async fn summary(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<DashboardSummary>>> {
    let summary = state.services.dashboard.summary().await?;
    Ok(Json(ApiResponse::ok(summary)))
}
