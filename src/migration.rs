//! Versioned schema migrations from `migrations/`, embedded at compile time.
//!
//! Migrations run against the target database first. Only when that database does not
//! exist (SQLSTATE 3D000) is the server's `postgres` database used to create it, after
//! which the migrations are run again.

use crate::error::StartupError;
use async_trait::async_trait;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const UNDEFINED_DATABASE: &str = "3D000";
const MAINTENANCE_DATABASE: &str = "postgres";

/// A database the schema can be applied to.
#[async_trait]
pub trait SchemaTarget: Send + Sync {
    async fn run_migrations(&self) -> Result<(), MigrateError>;

    /// Create the target database itself.
    async fn create_database(&self) -> Result<(), StartupError>;

    fn database_missing(&self, err: &MigrateError) -> bool {
        is_undefined_database(err)
    }
}

pub fn is_undefined_database(err: &MigrateError) -> bool {
    match err {
        MigrateError::Execute(sqlx::Error::Database(db)) => {
            db.code().as_deref() == Some(UNDEFINED_DATABASE)
        }
        _ => false,
    }
}

pub struct PgSchemaTarget<'a> {
    pool: &'a PgPool,
    options: &'a PgConnectOptions,
}

impl<'a> PgSchemaTarget<'a> {
    pub fn new(pool: &'a PgPool, options: &'a PgConnectOptions) -> Self {
        Self { pool, options }
    }

    /// Database named in the URL, or the role name when the URL has none (the server default).
    fn database_name(&self) -> &str {
        self.options
            .get_database()
            .unwrap_or_else(|| self.options.get_username())
    }
}

#[async_trait]
impl SchemaTarget for PgSchemaTarget<'_> {
    async fn run_migrations(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(self.pool).await
    }

    async fn create_database(&self) -> Result<(), StartupError> {
        let name = self.database_name().to_string();
        let mut conn = self
            .options
            .clone()
            .database(MAINTENANCE_DATABASE)
            .connect()
            .await?;
        sqlx::query(&format!("CREATE DATABASE \"{}\"", name.replace('"', "\"\"")))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %name, "created database");
        Ok(())
    }
}

/// Apply pending migrations, creating the database first only if it is missing.
pub async fn apply_migrations<T>(target: &T) -> Result<(), StartupError>
where
    T: SchemaTarget + ?Sized,
{
    match target.run_migrations().await {
        Ok(()) => Ok(()),
        Err(e) if target.database_missing(&e) => {
            tracing::warn!(error = %e, "target database does not exist; creating it");
            target.create_database().await?;
            target.run_migrations().await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Startup policy: a failed migration is logged and the service keeps running,
/// possibly against a stale or missing schema. Returns whether migrations succeeded.
pub async fn migrate_or_continue<T>(target: &T) -> bool
where
    T: SchemaTarget + ?Sized,
{
    match apply_migrations(target).await {
        Ok(()) => {
            tracing::info!("database migrated");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "database migration failed; continuing without it");
            false
        }
    }
}
