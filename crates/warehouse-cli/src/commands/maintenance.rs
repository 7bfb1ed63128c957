//! Ledger and catalogue maintenance commands.

use clap::{Args, Subcommand};

use warehouse_core::config::AppConfig;
use warehouse_core::error::AppError;

use crate::output;

/// Arguments for maintenance commands
#[derive(Debug, Args)]
pub struct MaintenanceArgs {
    /// User the command runs as
    #[arg(long = "as", default_value = "admin", global = true)]
    pub run_as: String,

    /// Maintenance subcommand
    #[command(subcommand)]
    pub command: MaintenanceCommand,
}

/// Maintenance subcommands
#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// Recompute cached item quantities from stock rows
    SyncQuantities,
    /// Archive items that have been out of stock too long
    AutoArchive,
    /// Regenerate SKUs and names of every item
    RegenerateSkus,
    /// Recompute category slugs and storage paths
    RebuildPaths,
}

/// Execute maintenance commands
pub async fn execute(args: &MaintenanceArgs, config: AppConfig) -> Result<(), AppError> {
    let state = super::create_services(config).await?;
    let ctx = super::acting_user(&state, &args.run_as).await?;

    match &args.command {
        MaintenanceCommand::SyncQuantities => {
            let fixed = state.ledger_service.sync_quantities(&ctx).await?;
            output::print_success(&format!("{fixed} item quantities corrected."));
        }
        MaintenanceCommand::AutoArchive => {
            let archived = state.item_service.auto_archive(&ctx).await?;
            output::print_success(&format!("{archived} items archived."));
        }
        MaintenanceCommand::RegenerateSkus => {
            let summary = state.item_service.regenerate_all(&ctx).await?;
            output::print_success(&format!(
                "{} of {} items regenerated.",
                summary.updated, summary.total
            ));
        }
        MaintenanceCommand::RebuildPaths => {
            let summary = state.category_service.rebuild_paths(&ctx).await?;
            output::print_success(&format!(
                "{} of {} categories updated.",
                summary.updated, summary.total
            ));
        }
    }

    Ok(())
}
