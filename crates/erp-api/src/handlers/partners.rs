//! Supplier, customer and carrier handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use erp_core::types::{CarrierId, CustomerId, PageResponse, SupplierId};
use erp_entity::partner::{
    Carrier, CarrierPatch, Customer, NewCarrier, NewCustomer, NewSupplier, Supplier,
};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

// ── Suppliers ────────────────────────────────────────────────────

/// GET /api/suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<Supplier>>>> {
    let page = state.services.suppliers.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/suppliers/{id}
pub async fn get_supplier(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<SupplierId>,
) -> ApiResult<Json<ApiResponse<Supplier>>> {
    let supplier = state.services.suppliers.get(id).await?;
    Ok(Json(ApiResponse::ok(supplier)))
}

/// POST /api/suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new): Json<NewSupplier>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Supplier>>)> {
    let supplier = state.services.suppliers.create(&auth, &new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(supplier))))
}

// ── Customers ────────────────────────────────────────────────────

/// GET /api/customers
pub async fn list_customers(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<Customer>>>> {
    let page = state.services.customers.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/customers/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<CustomerId>,
) -> ApiResult<Json<ApiResponse<Customer>>> {
    let customer = state.services.customers.get(id).await?;
    Ok(Json(ApiResponse::ok(customer)))
}

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new): Json<NewCustomer>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Customer>>)> {
    let customer = state.services.customers.create(&auth, &new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(customer))))
}

// ── Carriers ─────────────────────────────────────────────────────

/// GET /api/carriers
pub async fn list_carriers(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Carrier>>>> {
    let carriers = state.services.carriers.list().await?;
    Ok(Json(ApiResponse::ok(carriers)))
}

/// POST /api/carriers
pub async fn add_carrier(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new): Json<NewCarrier>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Carrier>>)> {
    let carrier = state.services.carriers.add(&auth, new).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(carrier))))
}

/// PATCH /api/carriers/{id}
pub async fn edit_carrier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CarrierId>,
    Json(patch): Json<CarrierPatch>,
) -> ApiResult<Json<ApiResponse<Carrier>>> {
    let carrier = state.services.carriers.edit(&auth, id, patch).await?;
    Ok(Json(ApiResponse::ok(carrier)))
}

/// DELETE /api/carriers/{id}
pub async fn delete_carrier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<CarrierId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.services.carriers.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "Carrier {id} deleted"
    )))))
}
