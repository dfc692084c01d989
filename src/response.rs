//! Response helpers.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 201 with the created resource as the body and `location` in the `Location` header.
pub fn created<T: Serialize>(location: String, data: T) -> Response {
    let mut resp = (StatusCode::CREATED, Json(data)).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        resp.headers_mut().insert(header::LOCATION, value);
    }
    resp
}
