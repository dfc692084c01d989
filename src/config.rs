//! Process configuration from environment variables.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug)]
pub struct Config {
    pub connect_options: PgConnectOptions,
    pub port: u16,
}

impl Config {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through an arbitrary lookup. `DATABASE_URL` is required and must parse as
    /// PostgreSQL connect options; `PORT` defaults to 8080.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
        if !(database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")) {
            return Err(ConfigError::Invalid {
                name: DATABASE_URL_VAR,
                reason: "expected a postgres:// or postgresql:// url".into(),
            });
        }
        let connect_options =
            PgConnectOptions::from_str(&database_url).map_err(|e| ConfigError::Invalid {
                name: DATABASE_URL_VAR,
                reason: e.to_string(),
            })?;

        let port = match lookup(PORT_VAR).map(|s| s.trim().to_string()) {
            None => DEFAULT_PORT,
            Some(s) if s.is_empty() => DEFAULT_PORT,
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid {
                name: PORT_VAR,
                reason: format!("'{}' is not a port number", s),
            })?,
        };

        Ok(Self {
            connect_options,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
