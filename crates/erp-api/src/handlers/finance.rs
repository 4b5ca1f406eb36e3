//! Finance handlers: bank accounts, credit cards and the bank and card
//! network name lists.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use erp_entity::finance::{
    Bank, BankAccount, CardNetwork, CreditCard, NewBankAccount, NewCreditCard,
};

use crate::dto::request::NameRequest;
use crate::dto::response::{ApiResponse, RemovedResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/finance/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BankAccount>>>> {
    let accounts = state.services.finance.list_accounts().await?;
    Ok(Json(ApiResponse::ok(accounts)))
}

/// POST /api/finance/accounts
pub async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new): Json<NewBankAccount>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BankAccount>>)> {
    let account = state.services.finance.create_account(&auth, new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(account))))
}

/// GET /api/finance/cards
pub async fn list_cards(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<CreditCard>>>> {
    let cards = state.services.finance.list_cards().await?;
    Ok(Json(ApiResponse::ok(cards)))
}

/// POST /api/finance/cards
pub async fn create_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new): Json<NewCreditCard>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreditCard>>)> {
    let card = state.services.finance.create_card(&auth, new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(card))))
}

/// GET /api/finance/banks
pub async fn list_banks(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Bank>>>> {
    let banks = state.services.finance.banks().list().await?;
    Ok(Json(ApiResponse::ok(banks)))
}

/// POST /api/finance/banks
pub async fn add_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NameRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Bank>>)> {
    let bank = state.services.finance.banks().add(&auth, &req.name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(bank))))
}

/// DELETE /api/finance/banks/{name}
pub async fn remove_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<RemovedResponse>>> {
    let removed = state.services.finance.banks().remove(&auth, &name).await?;
    Ok(Json(ApiResponse::ok(RemovedResponse { removed })))
}

/// GET /api/finance/card-networks
pub async fn list_card_networks(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<CardNetwork>>>> {
    let networks = state.services.finance.card_networks().list().await?;
    Ok(Json(ApiResponse::ok(networks)))
}

/// POST /api/finance/card-networks
pub async fn add_card_network(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NameRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CardNetwork>>)> {
    let network = state
        .services
        .finance
        .card_networks()
        .add(&auth, &req.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(network))))
}

/// DELETE /api/finance/card-networks/{name}
pub async fn remove_card_network(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<RemovedResponse>>> {
    let removed = state
        .services
        .finance
        .card_networks()
        .remove(&auth, &name)
        .await?;
    Ok(Json(ApiResponse::ok(RemovedResponse { removed })))
}
