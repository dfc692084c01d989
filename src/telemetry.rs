//! Log filter setup.

use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_VAR: &str = "RUST_LOG";
pub const DEFAULT_LOG_FILTER: &str = "product_api=info,tower_http=info";

/// Load the dotenv file (`.env` in the working directory when `env_file` is `None`),
/// then build the filter from `var`. The file is read first so it can set the filter.
pub fn env_filter_from(env_file: Option<&Path>, var: &str) -> EnvFilter {
    let loaded = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    loaded.ok();
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter_from(None, LOG_FILTER_VAR))
        .init();
}
