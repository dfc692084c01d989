//! PostgreSQL-backed product repository.

use super::ProductRepository;
use crate::error::AppError;
use crate::model::{NewProduct, Product};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn fetch_all(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, is_active, created_at FROM products",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, is_active, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, is_active, created_at
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.is_active)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
