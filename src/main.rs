//! Warehouse server: inventory, stock ledger and storage locations over HTTP.
//!
//! Main entry point that loads configuration, connects to the database,
//! applies migrations and starts the API server.

use tracing_subscriber::{EnvFilter, fmt};

use warehouse_core::config::{AppConfig, LogFormat};
use warehouse_core::error::AppError;
use warehouse_database::DatabasePool;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `WAREHOUSE_ENV` overlay and
/// `WAREHOUSE__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("WAREHOUSE_ENV").unwrap_or_else(|_| "development".to_string());
    let dir = std::env::var("WAREHOUSE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter()));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting warehouse server");
    if config.auth.uses_insecure_secret() {
        tracing::warn!("auth.jwt_secret is the default or too short; set WAREHOUSE__AUTH__JWT_SECRET");
    }

    let db_pool = DatabasePool::connect(&config.database).await?.into_pool();
    warehouse_database::migration::run_migrations(&db_pool).await?;

    warehouse_api::run_server(config, db_pool).await?;

    tracing::info!("Warehouse server stopped");
    Ok(())
}
