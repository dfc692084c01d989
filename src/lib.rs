//! Product API: a small CRUD service over PostgreSQL with CORS, rate limiting and OpenAPI docs.

pub mod app;
pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod telemetry;

pub use app::{build_app, cors_layer, ALLOWED_ORIGINS};
pub use config::Config;
pub use error::{AppError, ConfigError, FieldViolation, StartupError};
pub use migration::{apply_migrations, migrate_or_continue, PgSchemaTarget, SchemaTarget};
pub use model::{CreateProduct, NewProduct, Product};
pub use rate_limit::{FixedWindowLimiter, RateLimitConfig};
pub use state::AppState;
pub use store::{InMemoryProductRepository, PgProductRepository, ProductRepository};
