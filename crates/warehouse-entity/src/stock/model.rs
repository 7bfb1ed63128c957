//! Per-location stock row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Quantity of one item at one storage location.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryStock {
    /// Unique row identifier.
    pub id: Uuid,
    /// The stocked item.
    pub item_id: Uuid,
    /// Where the stock is held.
    pub storage_location_id: Uuid,
    /// Units at this location. Never negative.
    pub quantity: i32,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A stock row joined with its location's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockWithLocation {
    /// The stock row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub stock: InventoryStock,
    /// Name of the storage location.
    pub location_name: String,
}
