//! Router assembly: routes, docs, CORS, rate limiting and request tracing.

use crate::docs::docs_routes;
use crate::rate_limit::{enforce_rate_limit, FixedWindowLimiter};
use crate::routes::{common_routes, product_routes};
use crate::state::AppState;
use axum::{http::HeaderValue, middleware, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Origins allowed to call the API from a browser.
pub const ALLOWED_ORIGINS: [&str; 3] = [
    "https://back.lhtecnologia.net.br",
    "https://front.lhtecnologia.net.br",
    "http://localhost:3000",
];

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Fixed origin allow-list, any header, any method.
pub fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .into_iter()
        .map(HeaderValue::from_static)
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers(Any)
        .allow_methods(Any)
}

/// Full application. Requests pass the rate limiter first, then CORS, then routing.
pub fn build_app(state: AppState, limiter: Arc<FixedWindowLimiter>) -> Router {
    Router::new()
        .merge(product_routes(state.clone()))
        .merge(common_routes(state))
        .merge(docs_routes())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(limiter, enforce_rate_limit))
        .layer(TraceLayer::new_for_http())
}
