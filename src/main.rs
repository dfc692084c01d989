//! Service entry point: logging, config, pool, middleware, migrations, listener.

use product_api::{
    build_app, migrate_or_continue, AppState, Config, FixedWindowLimiter, PgProductRepository,
    PgSchemaTarget, RateLimitConfig,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    product_api::telemetry::init_tracing();

    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(config.connect_options.clone());
    let state = AppState::new(Arc::new(PgProductRepository::new(pool.clone())));

    let limiter = Arc::new(FixedWindowLimiter::new(RateLimitConfig::default()));
    limiter.spawn_replenisher();

    let app = build_app(state, limiter);

    migrate_or_continue(&PgSchemaTarget::new(&pool, &config.connect_options)).await;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
