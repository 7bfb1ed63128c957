//! Inventory ledger repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use warehouse_core::result::AppResult;
use warehouse_core::types::pagination::{PageRequest, PageResponse};
use warehouse_entity::stock::{
    ActivityCount, CreateTransaction, InventoryTransaction, TransactionKind, TransactionView,
};

use super::db_err;

const VIEW_SELECT: &str = "SELECT t.*, i.name AS item_name, i.sku AS item_sku, \
     u.display_name AS creator_name, l.name AS location_name, fl.name AS from_location_name \
     FROM inventory_transactions t \
     LEFT JOIN inventory_items i ON i.id = t.item_id \
     LEFT JOIN users u ON u.id = t.created_by \
     LEFT JOIN storage_locations l ON l.id = t.storage_location_id \
     LEFT JOIN storage_locations fl ON fl.id = t.from_storage_location_id";

/// Repository for the append-only inventory ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    /// Create a new ledger repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ledger rows since `since`, counted per kind and reason.
    pub async fn activity_since(&self, since: DateTime<Utc>) -> AppResult<Vec<ActivityCount>> {
        sqlx::query_as::<_, ActivityCount>(
            "SELECT type, reason, COUNT(*) AS count FROM inventory_transactions \
             WHERE created_at >= $1 GROUP BY type, reason",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to count ledger activity"))
    }

    /// Append a ledger entry.
    pub async fn create<'e, E>(&self, executor: E, data: &CreateTransaction) -> AppResult<InventoryTransaction>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryTransaction>(
            "INSERT INTO inventory_transactions \
             (item_id, change_amount, type, reason, storage_location_id, from_storage_location_id, \
              cost_price, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.item_id)
        .bind(data.change_amount)
        .bind(data.kind)
        .bind(&data.reason)
        .bind(data.storage_location_id)
        .bind(data.from_storage_location_id)
        .bind(data.cost_price)
        .bind(data.created_by)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to write ledger entry"))
    }

    /// Ledger entries, newest first, with display names.
    pub async fn search(
        &self,
        item_id: Option<Uuid>,
        kind: Option<TransactionKind>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TransactionView>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if item_id.is_some() {
            conditions.push(format!("t.item_id = ${param_idx}"));
            param_idx += 1;
        }
        if kind.is_some() {
            conditions.push(format!("t.type = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM inventory_transactions t {where_clause}");
        let select_sql = format!(
            "{VIEW_SELECT} {where_clause} ORDER BY t.created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, TransactionView>(&select_sql);

        if let Some(id) = item_id {
            count_query = count_query.bind(id);
            select_query = select_query.bind(id);
        }
        if let Some(k) = kind {
            count_query = count_query.bind(k);
            select_query = select_query.bind(k);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count ledger entries"))?;

        let entries = select_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to load ledger entries"))?;

        Ok(PageResponse::new(entries, page, total as u64))
    }

    /// IDs among `item_ids` that have at least one ledger entry.
    pub async fn items_with_history(&self, item_ids: &[Uuid]) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT item_id FROM inventory_transactions WHERE item_id = ANY($1)",
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to find item history"))
    }

    /// Delete ledger entries by ID.
    pub async fn delete_many<'e, E>(&self, executor: E, ids: &[Uuid]) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_transactions WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete ledger entries"))?;
        Ok(result.rows_affected())
    }

    /// Delete all ledger entries of the given items.
    pub async fn delete_for_items<'e, E>(&self, executor: E, item_ids: &[Uuid]) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_transactions WHERE item_id = ANY($1)")
            .bind(item_ids)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete item history"))?;
        Ok(result.rows_affected())
    }

    /// Delete the whole ledger.
    pub async fn clear<'e, E>(&self, executor: E) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_transactions")
            .execute(executor)
            .await
            .map_err(db_err("Failed to clear ledger"))?;
        Ok(result.rows_affected())
    }

    /// Null out references to a location that is about to be deleted.
    pub async fn detach_location<'e, E>(&self, executor: E, location_id: Uuid) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory_transactions SET \
             storage_location_id = NULLIF(storage_location_id, $1), \
             from_storage_location_id = NULLIF(from_storage_location_id, $1) \
             WHERE storage_location_id = $1 OR from_storage_location_id = $1",
        )
        .bind(location_id)
        .execute(executor)
        .await
        .map_err(db_err("Failed to detach ledger from location"))?;
        Ok(result.rows_affected())
    }
}
