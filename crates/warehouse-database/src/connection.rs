//! PostgreSQL pool setup and transaction helpers.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::info;

use warehouse_core::config::DatabaseConfig;
use warehouse_core::error::{AppError, ErrorKind};

/// Connection pool handle.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Parses the URL and opens the pool; fails if no connection can be made.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options: PgConnectOptions = config.url.parse().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid database.url", e)
        })?;

        info!(
            host = %options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or("-"),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, format!("Database unreachable: {e}"), e)
            })?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Unwraps the sqlx pool.
    pub fn into_pool(self) -> PgPool {
        self.pool
    }

    /// Opens a transaction.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        begin(&self.pool).await
    }

    /// Round-trips a trivial query.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Database ping failed", e))
    }
}

/// Opens a transaction on `pool`.
pub async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
    pool.begin()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
}

/// Commits `tx`.
pub async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), AppError> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_a_configuration_error() {
        let err = DatabasePool::connect(&DatabaseConfig::with_url("not a url"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
