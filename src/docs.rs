//! OpenAPI document and Swagger UI.

use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::product;
use crate::model::{CreateProduct, Product};
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const SWAGGER_UI_PATH: &str = "/swagger";
pub const OPENAPI_JSON_PATH: &str = "/swagger/v1/swagger.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LH Tecnologia API",
        version = "v1",
        description = "RESTful product API with Rust and PostgreSQL"
    ),
    paths(product::list_products, product::create_product),
    components(schemas(Product, CreateProduct, ErrorBody, ErrorDetail)),
    tags((name = "products", description = "Product catalogue"))
)]
pub struct ApiDoc;

/// Swagger UI plus the JSON document it renders. Served in every environment.
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}
