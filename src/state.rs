//! Shared application state for all routes.

use crate::store::ProductRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}
