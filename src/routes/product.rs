//! Product routes.

use crate::handlers::product::{create_product, list_products, PRODUCTS_PATH};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET and POST on `/api/products`. No update or delete routes exist.
pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route(PRODUCTS_PATH, get(list_products).post(create_product))
        .with_state(state)
}
