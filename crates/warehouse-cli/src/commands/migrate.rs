//! Database migration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use warehouse_core::config::AppConfig;
use warehouse_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show applied and pending migrations
    Status,
}

/// Row of the status table
#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    version: i64,
    description: String,
    state: &'static str,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            warehouse_database::migration::run_migrations(&pool).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let rows: Vec<StatusRow> = warehouse_database::migration::migration_status(&pool)
                .await?
                .into_iter()
                .map(|m| StatusRow {
                    version: m.version,
                    description: m.description,
                    state: if m.applied { "applied" } else { "pending" },
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    pool.close().await;
    Ok(())
}
