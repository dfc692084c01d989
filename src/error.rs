//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Failures while preparing the schema at boot. Never turned into an HTTP response.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("migration: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// One failed field constraint on an incoming payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed for {}", fields(.0))]
    Validation(Vec<FieldViolation>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("too many requests")]
    RateLimited,
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

fn fields(violations: &[FieldViolation]) -> String {
    let mut names: Vec<&str> = violations.iter().map(|v| v.field).collect();
    names.dedup();
    names.join(", ")
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    /// Field name to messages, present on validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match &self {
            AppError::Validation(violations) => {
                let mut by_field: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for v in violations {
                    by_field.entry(v.field).or_default().push(v.message.as_str());
                }
                (
                    "validation_error",
                    self.to_string(),
                    serde_json::to_value(by_field).ok(),
                )
            }
            AppError::BadRequest(_) => ("bad_request", self.to_string(), None),
            AppError::UnsupportedMediaType(_) => ("unsupported_media_type", self.to_string(), None),
            AppError::PayloadTooLarge(_) => ("payload_too_large", self.to_string(), None),
            AppError::RateLimited => ("rate_limited", self.to_string(), None),
            AppError::Db(e) => {
                tracing::error!(error = %e, "database error");
                ("database_error", "internal server error".to_string(), None)
            }
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
