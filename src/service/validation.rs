//! Field validation for incoming product payloads.

use crate::error::{AppError, FieldViolation};
use crate::model::{CreateProduct, NewProduct};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;

/// Exclusive lower bound: 0.01.
pub fn price_floor() -> Decimal {
    Decimal::new(1, 2)
}

/// Inclusive upper bound: 10000.00.
pub fn price_ceiling() -> Decimal {
    Decimal::new(1_000_000, 2)
}

/// The price as it will be stored: rounded to cents like `NUMERIC(18,2)`.
pub fn stored_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check every field and collect all violations. Empty means valid.
    pub fn violations(body: &CreateProduct) -> Vec<FieldViolation> {
        let mut out = Vec::new();

        match body.name.as_deref().map(str::trim) {
            None | Some("") => out.push(FieldViolation::new("name", "name is required")),
            Some(_) => {
                let len = body.name.as_deref().map(|s| s.chars().count()).unwrap_or(0);
                if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
                    out.push(FieldViolation::new(
                        "name",
                        format!(
                            "name must be between {} and {} characters",
                            NAME_MIN_CHARS, NAME_MAX_CHARS
                        ),
                    ));
                }
            }
        }

        let price = stored_price(body.price.unwrap_or(Decimal::ZERO));
        if price <= price_floor() || price > price_ceiling() {
            out.push(FieldViolation::new(
                "price",
                format!(
                    "price must be greater than {} and at most {}",
                    price_floor(),
                    price_ceiling()
                ),
            ));
        }

        out
    }

    /// Validate and convert into a record stamped with `now`.
    pub fn validate(body: CreateProduct, now: DateTime<Utc>) -> Result<NewProduct, AppError> {
        let violations = Self::violations(&body);
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }
        Ok(NewProduct {
            name: body.name.unwrap_or_default(),
            price: stored_price(body.price.unwrap_or(Decimal::ZERO)),
            is_active: body.is_active.unwrap_or(true),
            created_at: now,
        })
    }
}
