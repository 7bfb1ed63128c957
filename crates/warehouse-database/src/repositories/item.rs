//! Inventory item repository implementation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use warehouse_core::result::AppResult;
use warehouse_core::types::pagination::{PageRequest, PageResponse};
use warehouse_entity::item::{
    InventoryItem, ItemData, ItemFilter, ItemImages, ItemRef, ItemSummary, LowStockItem,
    StockStatusFilter,
};

use super::db_err;

/// Repository for inventory items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Create a new item repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The pool for executor-generic reads outside a transaction.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a transaction on this repository's pool.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        crate::connection::begin(&self.pool).await
    }

    /// Find an item by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<InventoryItem>> {
        sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find item"))
    }

    /// Find and lock an item row for the rest of the transaction.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> AppResult<Option<InventoryItem>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to lock item"))
    }

    /// Find several items by ID.
    pub async fn find_many<'e, E>(&self, executor: E, ids: &[Uuid]) -> AppResult<Vec<InventoryItem>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE id = ANY($1) ORDER BY created_at",
        )
        .bind(ids)
        .fetch_all(executor)
        .await
        .map_err(db_err("Failed to load items"))
    }

    /// Find an item by SKU, case-insensitively, optionally ignoring one item.
    pub async fn find_by_sku(&self, sku: &str, exclude_id: Option<Uuid>) -> AppResult<Option<InventoryItem>> {
        sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items \
             WHERE UPPER(sku) = UPPER($1) AND ($2::UUID IS NULL OR id <> $2) LIMIT 1",
        )
        .bind(sku.trim())
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find item by SKU"))
    }

    /// Names of every item except `exclude_id`, for fuzzy matching.
    pub async fn name_candidates(&self, exclude_id: Option<Uuid>) -> AppResult<Vec<ItemRef>> {
        sqlx::query_as::<_, ItemRef>(
            "SELECT id, name, sku, is_archived FROM inventory_items \
             WHERE ($1::UUID IS NULL OR id <> $1)",
        )
        .bind(exclude_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load item names"))
    }

    /// Search items with filters.
    pub async fn search(
        &self,
        filter: &ItemFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ItemSummary>> {
        let mut conditions = vec!["i.is_archived = $1".to_string()];
        let mut param_idx = 2u32;

        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));
        if search.is_some() {
            conditions.push(format!("(i.name ILIKE ${param_idx} OR i.sku ILIKE ${param_idx})"));
            param_idx += 1;
        }

        let by_category = !filter.orphaned && !filter.category_ids.is_empty();
        if filter.orphaned {
            conditions.push("i.category_id IS NULL".to_string());
        } else if by_category {
            conditions.push(format!("i.category_id = ANY(${param_idx})"));
            param_idx += 1;
        }

        match filter.status {
            StockStatusFilter::All => {}
            StockStatusFilter::In => {
                conditions.push("i.quantity > i.low_stock_threshold".to_string());
            }
            StockStatusFilter::Low => conditions.push(
                "i.quantity <= i.low_stock_threshold AND i.quantity > i.critical_stock_threshold"
                    .to_string(),
            ),
            StockStatusFilter::Out => {
                conditions.push("i.quantity <= i.critical_stock_threshold".to_string());
            }
        }

        if filter.location_id.is_some() {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM inventory_stocks s WHERE s.item_id = i.id \
                 AND s.storage_location_id = ${param_idx} AND s.quantity > 0)"
            ));
            param_idx += 1;
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        let count_sql = format!("SELECT COUNT(*) FROM inventory_items i {where_clause}");
        let select_sql = format!(
            "SELECT i.*, c.name AS category_name FROM inventory_items i \
             LEFT JOIN inventory_categories c ON c.id = i.category_id \
             {where_clause} ORDER BY {} LIMIT ${param_idx} OFFSET ${}",
            filter.sort.order_by(),
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(filter.archived);
        let mut select_query = sqlx::query_as::<_, ItemSummary>(&select_sql).bind(filter.archived);

        if let Some(ref pattern) = search {
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern.clone());
        }
        if by_category {
            count_query = count_query.bind(filter.category_ids.clone());
            select_query = select_query.bind(filter.category_ids.clone());
        }
        if let Some(location_id) = filter.location_id {
            count_query = count_query.bind(location_id);
            select_query = select_query.bind(location_id);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count items"))?;

        let items = select_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to search items"))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    /// Insert an item with zero stock.
    pub async fn create<'e, E>(&self, executor: E, data: &ItemData) -> AppResult<InventoryItem>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryItem>(
            "INSERT INTO inventory_items \
             (name, sku, category_id, item_type, unit, low_stock_threshold, critical_stock_threshold, \
              description, brand_code, quality_code, material_code, color_code, size_code, attributes, \
              image, image_back, image_side, image_details, cost_price, selling_price, \
              quantity, zero_stock_since) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, \
                     $19, $20, 0, NOW()) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.sku)
        .bind(data.category_id)
        .bind(data.item_type)
        .bind(&data.unit)
        .bind(data.low_stock_threshold)
        .bind(data.critical_stock_threshold)
        .bind(&data.description)
        .bind(&data.brand_code)
        .bind(&data.quality_code)
        .bind(&data.material_code)
        .bind(&data.color_code)
        .bind(&data.size_code)
        .bind(&data.attributes)
        .bind(&data.image)
        .bind(&data.image_back)
        .bind(&data.image_side)
        .bind(&data.image_details)
        .bind(data.cost_price)
        .bind(data.selling_price)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to create item"))
    }

    /// Overwrite an item's writable fields. Quantity and archive state are untouched.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &ItemData,
    ) -> AppResult<Option<InventoryItem>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryItem>(
            "UPDATE inventory_items SET \
             name = $2, sku = $3, category_id = $4, item_type = $5, unit = $6, \
             low_stock_threshold = $7, critical_stock_threshold = $8, description = $9, \
             brand_code = $10, quality_code = $11, material_code = $12, color_code = $13, \
             size_code = $14, attributes = $15, image = $16, image_back = $17, image_side = $18, \
             image_details = $19, cost_price = $20, selling_price = $21, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.sku)
        .bind(data.category_id)
        .bind(data.item_type)
        .bind(&data.unit)
        .bind(data.low_stock_threshold)
        .bind(data.critical_stock_threshold)
        .bind(&data.description)
        .bind(&data.brand_code)
        .bind(&data.quality_code)
        .bind(&data.material_code)
        .bind(&data.color_code)
        .bind(&data.size_code)
        .bind(&data.attributes)
        .bind(&data.image)
        .bind(&data.image_back)
        .bind(&data.image_side)
        .bind(&data.image_details)
        .bind(data.cost_price)
        .bind(data.selling_price)
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to update item"))
    }

    /// Store a regenerated SKU and name.
    pub async fn update_sku_and_name<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        sku: Option<&str>,
        name: &str,
    ) -> AppResult<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE inventory_items SET sku = $2, name = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(sku)
        .bind(name)
        .execute(executor)
        .await
        .map_err(db_err("Failed to update item SKU"))?;
        Ok(())
    }

    /// Store the image URLs of an item.
    pub async fn update_images<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        images: &ItemImages,
    ) -> AppResult<InventoryItem>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryItem>(
            "UPDATE inventory_items SET image = $2, image_back = $3, image_side = $4, \
             image_details = $5, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&images.image)
        .bind(&images.image_back)
        .bind(&images.image_side)
        .bind(images.details_json())
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to update item images"))
    }

    /// Every item that belongs to a category.
    pub async fn list_categorized(&self) -> AppResult<Vec<InventoryItem>> {
        sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE category_id IS NOT NULL ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list categorized items"))
    }

    /// Store the recomputed cached total. `cost_price` is only replaced when given.
    pub async fn set_totals<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
        zero_stock_since: Option<DateTime<Utc>>,
        cost_price: Option<Decimal>,
    ) -> AppResult<InventoryItem>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryItem>(
            "UPDATE inventory_items SET quantity = $2, zero_stock_since = $3, \
             cost_price = COALESCE($4, cost_price), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(quantity)
        .bind(zero_stock_since)
        .bind(cost_price)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to update item quantity"))
    }

    /// Recompute every item's cached total and zero-stock marker from its
    /// stock rows. Returns the number of items that changed.
    pub async fn sync_totals<'e, E>(&self, executor: E) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory_items i SET \
             quantity = t.total, \
             zero_stock_since = CASE WHEN t.total > 0 THEN NULL \
                                     ELSE COALESCE(i.zero_stock_since, NOW()) END, \
             updated_at = NOW() \
             FROM (SELECT it.id, COALESCE(SUM(s.quantity), 0)::INTEGER AS total \
                   FROM inventory_items it \
                   LEFT JOIN inventory_stocks s ON s.item_id = it.id \
                   GROUP BY it.id) t \
             WHERE t.id = i.id \
               AND (i.quantity <> t.total OR (t.total > 0) = (i.zero_stock_since IS NOT NULL))",
        )
        .execute(executor)
        .await
        .map_err(db_err("Failed to sync item quantities"))?;
        Ok(result.rows_affected())
    }

    /// Mark an item archived.
    pub async fn archive<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        archived_by: Uuid,
        reason: &str,
    ) -> AppResult<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE inventory_items SET is_archived = TRUE, archived_at = NOW(), \
             archived_by = $2, archive_reason = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(archived_by)
        .bind(reason)
        .execute(executor)
        .await
        .map_err(db_err("Failed to archive item"))?;
        Ok(())
    }

    /// Clear the archive state and restart the zero-stock clock.
    pub async fn restore<'e, E>(&self, executor: E, id: Uuid) -> AppResult<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE inventory_items SET is_archived = FALSE, archived_at = NULL, \
             archived_by = NULL, archive_reason = NULL, zero_stock_since = NOW(), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await
        .map_err(db_err("Failed to restore item"))?;
        Ok(())
    }

    /// Non-archived empty items whose stock ran out before `cutoff`.
    pub async fn zero_stock_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<InventoryItem>> {
        sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items \
             WHERE NOT is_archived AND quantity = 0 \
               AND zero_stock_since IS NOT NULL AND zero_stock_since < $1",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to find stale items"))
    }

    /// Move items into a category.
    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
        category_id: Option<Uuid>,
    ) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory_items SET category_id = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(category_id)
        .execute(executor)
        .await
        .map_err(db_err("Failed to change item category"))?;
        Ok(result.rows_affected())
    }

    /// Number of active items without a category.
    pub async fn orphaned_count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_items WHERE category_id IS NULL AND NOT is_archived",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count orphaned items"))
    }

    /// Total and reserved quantity over active items.
    pub async fn stock_totals(&self) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT, COALESCE(SUM(reserved_quantity), 0)::BIGINT \
             FROM inventory_items WHERE NOT is_archived",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to sum stock"))
    }

    /// Number of archived items.
    pub async fn archived_count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory_items WHERE is_archived")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count archived items"))
    }

    /// Active items at or below their low-stock threshold, emptiest first.
    pub async fn low_stock(&self, limit: i64) -> AppResult<Vec<LowStockItem>> {
        sqlx::query_as::<_, LowStockItem>(
            "SELECT id, name, quantity, unit FROM inventory_items \
             WHERE NOT is_archived AND quantity <= low_stock_threshold \
             ORDER BY quantity ASC, name ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list low-stock items"))
    }

    /// Delete items. Stock rows and transfers cascade.
    pub async fn delete_many<'e, E>(&self, executor: E, ids: &[Uuid]) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete items"))?;
        Ok(result.rows_affected())
    }
}
