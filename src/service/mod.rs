//! Request validation ahead of persistence.

mod validation;
pub use validation::{price_ceiling, price_floor, stored_price, RequestValidator, NAME_MAX_CHARS, NAME_MIN_CHARS};
