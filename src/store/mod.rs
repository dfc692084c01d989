//! Product persistence: repository trait and its PostgreSQL and in-memory implementations.

mod memory;
mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::PgProductRepository;

use crate::error::AppError;
use crate::model::{NewProduct, Product};
use async_trait::async_trait;

/// Reads and writes products. Handlers only see this trait, never SQL.
/// Errors are returned as-is; nothing here retries.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every stored product, in whatever order the backend yields them.
    async fn fetch_all(&self) -> Result<Vec<Product>, AppError>;

    /// Insert one product and return the stored row including its generated id.
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError>;

    /// Cheap connectivity check behind `/ready`.
    async fn ping(&self) -> Result<(), AppError>;
}
