//! Per-location stock repository implementation.

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use warehouse_core::result::AppResult;
use warehouse_entity::location::LocationStockItem;
use warehouse_entity::stock::{InventoryStock, StockWithLocation};

use super::db_err;

/// Repository for inventory stock rows.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    /// Create a new stock repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stock rows of an item with location names.
    pub async fn for_item(&self, item_id: Uuid) -> AppResult<Vec<StockWithLocation>> {
        sqlx::query_as::<_, StockWithLocation>(
            "SELECT s.*, l.name AS location_name FROM inventory_stocks s \
             JOIN storage_locations l ON l.id = s.storage_location_id \
             WHERE s.item_id = $1 \
             ORDER BY (l.sort_order = 0), l.sort_order, l.name",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load item stock"))
    }

    /// All stock rows of an item, locked.
    pub async fn for_item_for_update<'e, E>(&self, executor: E, item_id: Uuid) -> AppResult<Vec<InventoryStock>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryStock>(
            "SELECT * FROM inventory_stocks WHERE item_id = $1 ORDER BY created_at FOR UPDATE",
        )
        .bind(item_id)
        .fetch_all(executor)
        .await
        .map_err(db_err("Failed to lock item stock"))
    }

    /// Quantity of an item at one location, locking the row if it exists.
    pub async fn quantity_for_update<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<i32>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quantity = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM inventory_stocks \
             WHERE item_id = $1 AND storage_location_id = $2 FOR UPDATE",
        )
        .bind(item_id)
        .bind(location_id)
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to lock stock row"))?;
        Ok(quantity.unwrap_or(0))
    }

    /// Set the quantity of an item at a location, inserting the row if needed.
    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        location_id: Uuid,
        quantity: i32,
    ) -> AppResult<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO inventory_stocks (item_id, storage_location_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (item_id, storage_location_id) \
             DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW()",
        )
        .bind(item_id)
        .bind(location_id)
        .bind(quantity)
        .execute(executor)
        .await
        .map_err(db_err("Failed to write stock row"))?;
        Ok(())
    }

    /// Remove every stock row of an item except the one at `keep_location`.
    pub async fn delete_other_locations<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        keep_location: Uuid,
    ) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM inventory_stocks WHERE item_id = $1 AND storage_location_id <> $2",
        )
        .bind(item_id)
        .bind(keep_location)
        .execute(executor)
        .await
        .map_err(db_err("Failed to consolidate stock rows"))?;
        Ok(result.rows_affected())
    }

    /// Sum of an item's stock rows.
    pub async fn sum_for_item<'e, E>(&self, executor: E, item_id: Uuid) -> AppResult<i32>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(SUM(quantity), 0)::INTEGER FROM inventory_stocks WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to sum item stock"))
    }

    /// Total positive stock held at a location.
    pub async fn positive_total_for_location<'e, E>(&self, executor: E, location_id: Uuid) -> AppResult<i64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM inventory_stocks \
             WHERE storage_location_id = $1 AND quantity > 0",
        )
        .bind(location_id)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to sum location stock"))
    }

    /// Delete the empty rows left at a location.
    pub async fn delete_empty_for_location<'e, E>(&self, executor: E, location_id: Uuid) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM inventory_stocks WHERE storage_location_id = $1 AND quantity = 0",
        )
        .bind(location_id)
        .execute(executor)
        .await
        .map_err(db_err("Failed to delete empty stock rows"))?;
        Ok(result.rows_affected())
    }

    /// Delete all stock rows of the given items.
    pub async fn delete_for_items<'e, E>(&self, executor: E, item_ids: &[Uuid]) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_stocks WHERE item_id = ANY($1)")
            .bind(item_ids)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete item stock"))?;
        Ok(result.rows_affected())
    }

    /// Items with positive stock at any location, grouped by the caller.
    pub async fn positive_items_by_location(&self) -> AppResult<Vec<LocationStockItem>> {
        sqlx::query_as::<_, LocationStockItem>(
            "SELECT s.storage_location_id, i.id AS item_id, i.name, i.sku, s.quantity, i.unit \
             FROM inventory_stocks s JOIN inventory_items i ON i.id = s.item_id \
             WHERE s.quantity > 0 ORDER BY i.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load location stock"))
    }
}
