//! CLI command definitions and dispatch.

pub mod maintenance;
pub mod migrate;
pub mod seed;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use warehouse_api::{AppState, build_state};
use warehouse_cache::provider::CacheManager;
use warehouse_core::config::AppConfig;
use warehouse_core::error::AppError;
use warehouse_database::DatabasePool;
use warehouse_database::repositories::user::UserRepository;
use warehouse_service::RequestContext;

use crate::output::OutputFormat;

/// Warehouse administration
#[derive(Debug, Parser)]
#[command(name = "warehouse", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay; falls back to `WAREHOUSE_ENV`, then `development`
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Insert the system categories, attribute types and attributes
    Seed(seed::SeedArgs),
    /// Ledger and catalogue maintenance
    Maintenance(maintenance::MaintenanceArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Seed(args) => seed::execute(args, config, self.format).await,
            Commands::Maintenance(args) => maintenance::execute(args, config).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        let env = self
            .env
            .clone()
            .or_else(|| std::env::var("WAREHOUSE_ENV").ok())
            .unwrap_or_else(|| "development".to_string());
        AppConfig::load_from(&self.config, &env)
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: wire the services the HTTP server uses
pub async fn create_services(config: AppConfig) -> Result<AppState, AppError> {
    let pool = create_db_pool(&config).await?;
    let cache = Arc::new(CacheManager::new(&config.cache).await?);
    Ok(build_state(config, pool, cache))
}

/// Helper: request context of the user a command runs as
pub async fn acting_user(state: &AppState, username: &str) -> Result<RequestContext, AppError> {
    let users = UserRepository::new(state.db_pool.clone());
    let user = users
        .find_by_username(username)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::not_found(format!("Active user '{username}' not found")))?;

    Ok(RequestContext::new(
        user.id,
        user.role,
        user.display_name,
        None,
    ))
}
