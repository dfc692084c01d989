//! Product record and the create payload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored product. Field names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = 9.99)]
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/products`. Every field is optional here so that missing
/// values are reported by validation rather than by the JSON decoder.
/// `id` and `createdAt` are not part of the payload and are ignored if sent.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[schema(example = "Widget", min_length = 3, max_length = 100)]
    pub name: Option<String>,
    #[schema(value_type = Option<f64>, example = 9.99, maximum = 10000.0)]
    pub price: Option<Decimal>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

/// A validated product ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
