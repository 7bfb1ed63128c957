//! Location-to-location move record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded move of stock between two locations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryTransfer {
    /// Unique identifier.
    pub id: Uuid,
    /// Moved item.
    pub item_id: Uuid,
    /// Source location; null once the location is deleted.
    pub from_location_id: Option<Uuid>,
    /// Destination location; null once the location is deleted.
    pub to_location_id: Option<Uuid>,
    /// Units moved.
    pub quantity: i32,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Acting user.
    pub created_by: Uuid,
    /// When the move happened.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to record a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransfer {
    /// Moved item.
    pub item_id: Uuid,
    /// Source location.
    pub from_location_id: Uuid,
    /// Destination location.
    pub to_location_id: Uuid,
    /// Units moved.
    pub quantity: i32,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Acting user.
    pub created_by: Uuid,
}
