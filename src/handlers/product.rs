//! Product handlers: list and create.

use crate::error::{AppError, ErrorBody};
use crate::model::{CreateProduct, Product};
use crate::response::created;
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub const PRODUCTS_PATH: &str = "/api/products";

/// List all products. Order is whatever the database returns and is not stable.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses(
        (status = 200, description = "All products", body = [Product]),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Storage error", body = ErrorBody)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("fetching all products");
    let rows = state.products.fetch_all().await?;
    Ok((StatusCode::OK, Json(rows)))
}

/// Create a product. Validation runs before anything is written.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product,
            headers(("Location" = String, description = "Link to the created product"))),
        (status = 400, description = "Validation failed or malformed body", body = ErrorBody),
        (status = 413, description = "Body exceeds 64 KiB", body = ErrorBody),
        (status = 415, description = "Body is not JSON", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Storage error", body = ErrorBody)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(e) => AppError::UnsupportedMediaType(e.body_text()),
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::PayloadTooLarge(other.body_text())
        }
        other => AppError::BadRequest(other.body_text()),
    })?;
    let product = RequestValidator::validate(body, chrono::Utc::now())?;
    let stored = state.products.insert(product).await?;
    tracing::info!(id = stored.id, "product created");
    let location = format!("{}?id={}", PRODUCTS_PATH, stored.id);
    Ok(created(location, stored))
}
