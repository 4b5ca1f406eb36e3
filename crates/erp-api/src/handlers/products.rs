//! Product handlers. New products are posted as `multipart/form-data`
//! with a `product` JSON part and an optional `image` file part.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::types::{PageResponse, ProductId};
use erp_entity::product::{NewProduct, Product, ProductPatch};
use erp_service::ImageUpload;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ListParams};
use crate::state::AppState;

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthUser,
    ListParams(params): ListParams,
) -> ApiResult<Json<ApiResponse<PageResponse<Product>>>> {
    let page = state.services.products.list(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/products (multipart)
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let (new, image) = read_product_form(multipart).await?;
    let product = state
        .services
        .products
        .create_product(&auth, new, image)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<ProductId>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let product = state.services.products.get_product(id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// PATCH /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> ApiResult<Json<ApiResponse<Product>>> {
    let product = state
        .services
        .products
        .update_product(&auth, id, patch)
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

async fn read_product_form(
    mut multipart: Multipart,
) -> AppResult<(NewProduct, Option<ImageUpload>)> {
    let mut product: Option<NewProduct> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "product" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read product: {e}")))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::validation(format!("Invalid product: {e}")))?;
                product = Some(parsed);
            }
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read image: {e}")))?;
                // An empty file input means no image was picked.
                if !data.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            _ => {}
        }
    }

    let product = product.ok_or_else(|| AppError::validation("Missing 'product' field"))?;
    Ok((product, image))
}
