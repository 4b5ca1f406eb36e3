//! Auth handlers: password login, magic link, session adoption, refresh,
//! logout and the current user.

use axum::Json;
use axum::extract::State;
use tracing::info;

use erp_core::types::SessionUser;

use crate::dto::request::{LoginRequest, MagicLinkRequest, SetSessionRequest};
use crate::dto::response::{ApiResponse, MessageResponse, SessionResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

use super::validated;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let req = validated(req)?;
    let session = state
        .session
        .sign_in_with_password(req.email.trim(), &req.password)
        .await?;
    info!(user_id = %session.user.id, "Signed in with password");
    Ok(Json(ApiResponse::ok(session.into())))
}

/// POST /api/auth/magic-link
pub async fn magic_link(
    State(state): State<AppState>,
    Json(req): Json<MagicLinkRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    state.session.request_magic_link(&req.email).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Check your e-mail for the sign-in link",
    ))))
}

/// POST /api/auth/session
pub async fn set_session(
    State(state): State<AppState>,
    Json(req): Json<SetSessionRequest>,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let session = validated(req)?.into_session();
    let session = state.session.set_session(session).await?;
    info!(user_id = %session.user.id, "Signed in with magic link");
    Ok(Json(ApiResponse::ok(session.into())))
}

/// POST /api/auth/refresh
pub async fn refresh(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let session = state.session.refresh().await?;
    Ok(Json(ApiResponse::ok(session.into())))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.session.sign_out().await;
    info!(user_id = %auth.user_id(), "Signed out");
    Ok(Json(ApiResponse::ok(MessageResponse::new("Signed out"))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<SessionUser>> {
    Json(ApiResponse::ok(auth.context().user.clone()))
}
