//! System data seeding.

use clap::Args;
use serde::Serialize;

use warehouse_core::config::AppConfig;
use warehouse_core::error::AppError;
use warehouse_service::attribute::AttributeSeedSummary;
use warehouse_service::category::SeedSummary;
use warehouse_service::location::LocationSeedSummary;

use crate::output::{self, OutputFormat};

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Admin user the seed runs as
    #[arg(long = "as", default_value = "admin")]
    pub run_as: String,
}

#[derive(Debug, Serialize)]
struct SeedReport {
    categories: SeedSummary,
    attributes: AttributeSeedSummary,
    locations: LocationSeedSummary,
}

/// Seed categories first so attribute types can reference them.
pub async fn execute(
    args: &SeedArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::create_services(config).await?;
    let ctx = super::acting_user(&state, &args.run_as).await?;

    let categories = state.category_service.seed_system_categories(&ctx).await?;
    let attributes = state.attribute_service.seed_system_attributes(&ctx).await?;
    let locations = state.location_service.seed_locations(&ctx).await?;

    output::print_item(
        &SeedReport {
            categories,
            attributes,
            locations,
        },
        format,
    );
    output::print_success("System data seeded.");
    Ok(())
}
