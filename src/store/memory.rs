//! In-process product repository. Backs the router in tests and local experiments.

use super::ProductRepository;
use crate::error::AppError;
use crate::model::{NewProduct, Product};
use crate::service::stored_price;
use async_trait::async_trait;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryProductRepository {
    rows: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> AppError {
    AppError::Db(sqlx::Error::Protocol("in-memory store lock poisoned".into()))
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn fetch_all(&self) -> Result<Vec<Product>, AppError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.clone())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let id = rows.last().map(|p| p.id + 1).unwrap_or(1);
        let price = stored_price(product.price);
        let stored = Product {
            id,
            name: product.name,
            price,
            is_active: product.is_active,
            created_at: product.created_at,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
