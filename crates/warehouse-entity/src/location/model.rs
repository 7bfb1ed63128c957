//! Storage location entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What a storage location is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "location_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// Main storage.
    #[default]
    Warehouse,
    /// Production floor.
    Production,
    /// Office shelf.
    Office,
}

/// A named place where stock is held.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StorageLocation {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Free-form description.
    pub description: Option<String>,
    /// User responsible for the location.
    pub responsible_user_id: Option<Uuid>,
    /// Location kind.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: LocationKind,
    /// Protected locations need an admin password to delete.
    pub is_system: bool,
    /// At most one location is the default.
    pub is_default: bool,
    /// Whether the location accepts stock.
    pub is_active: bool,
    /// Manual ordering; 0 sorts last.
    pub sort_order: i32,
    /// When the location was created.
    pub created_at: DateTime<Utc>,
    /// When the location was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An item with positive stock at a location.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationStockItem {
    /// Location holding the stock.
    pub storage_location_id: Uuid,
    /// Item identifier.
    pub item_id: Uuid,
    /// Item name.
    pub name: String,
    /// Item SKU.
    pub sku: Option<String>,
    /// Units at the location.
    pub quantity: i32,
    /// Item unit.
    pub unit: String,
}

/// A location together with the items stocked there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationWithItems {
    /// The location row.
    #[serde(flatten)]
    pub location: StorageLocation,
    /// Responsible user's display name.
    pub responsible_user_name: Option<String>,
    /// Items with positive stock.
    pub items: Vec<LocationStockItem>,
}

/// Writable columns of a storage location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationData {
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Responsible user.
    pub responsible_user_id: Option<Uuid>,
    /// Location kind.
    pub kind: LocationKind,
    /// Protected flag.
    pub is_system: bool,
    /// Default flag.
    pub is_default: bool,
    /// Active flag.
    pub is_active: bool,
    /// Manual ordering.
    pub sort_order: i32,
}
