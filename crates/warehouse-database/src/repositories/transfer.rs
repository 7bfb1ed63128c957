//! Inventory transfer repository implementation.

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use warehouse_core::result::AppResult;
use warehouse_entity::stock::{CreateTransfer, InventoryTransfer};

use super::db_err;

/// Repository for location-to-location move records.
#[derive(Debug, Clone, Default)]
pub struct TransferRepository;

impl TransferRepository {
    /// Create a new transfer repository.
    pub fn new() -> Self {
        Self
    }

    /// Record a move.
    pub async fn create<'e, E>(&self, executor: E, data: &CreateTransfer) -> AppResult<InventoryTransfer>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryTransfer>(
            "INSERT INTO inventory_transfers \
             (item_id, from_location_id, to_location_id, quantity, comment, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.item_id)
        .bind(data.from_location_id)
        .bind(data.to_location_id)
        .bind(data.quantity)
        .bind(&data.comment)
        .bind(data.created_by)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to record transfer"))
    }

    /// Null out references to a location that is about to be deleted.
    pub async fn detach_location<'e, E>(&self, executor: E, location_id: Uuid) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory_transfers SET \
             from_location_id = NULLIF(from_location_id, $1), \
             to_location_id = NULLIF(to_location_id, $1), \
             updated_at = NOW() \
             WHERE from_location_id = $1 OR to_location_id = $1",
        )
        .bind(location_id)
        .execute(executor)
        .await
        .map_err(db_err("Failed to detach transfers from location"))?;
        Ok(result.rows_affected())
    }
}
