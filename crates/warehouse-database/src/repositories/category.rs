//! Inventory category repository implementation.

use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use warehouse_core::result::AppResult;
use warehouse_entity::category::{Category, CategoryData, CategoryWithStats};

use super::db_err;

/// Ordering shared by every category listing: explicit positions first,
/// unpositioned (0) last, newest first among equals.
const CATEGORY_ORDER: &str = "(c.sort_order = 0), c.sort_order, c.created_at DESC";

/// Repository for inventory categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository.
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

    /// All categories with counts over non-archived items.
    pub async fn list_with_stats(&self) -> AppResult<Vec<CategoryWithStats>> {
        let sql = format!(
            "SELECT c.*, COUNT(i.id) AS item_count, COALESCE(SUM(i.quantity), 0)::BIGINT AS total_quantity \
             FROM inventory_categories c \
             LEFT JOIN inventory_items i ON i.category_id = c.id AND NOT i.is_archived \
             GROUP BY c.id ORDER BY {CATEGORY_ORDER}"
        );
        sqlx::query_as::<_, CategoryWithStats>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list categories"))
    }

    /// Every category row, for building a hierarchy snapshot.
    pub async fn find_all<'e, E>(&self, executor: E) -> AppResult<Vec<Category>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT c.* FROM inventory_categories c ORDER BY {CATEGORY_ORDER}");
        sqlx::query_as::<_, Category>(&sql)
            .fetch_all(executor)
            .await
            .map_err(db_err("Failed to load categories"))
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM inventory_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find category"))
    }

    /// Insert a category.
    pub async fn create<'e, E>(&self, executor: E, data: &CategoryData) -> AppResult<Category>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            "INSERT INTO inventory_categories \
             (name, description, icon, color, prefix, parent_id, sort_order, is_active, is_system, \
              gender, singular_name, plural_name, default_unit, slug, full_path, show_in_sku, show_in_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.icon)
        .bind(&data.color)
        .bind(&data.prefix)
        .bind(data.parent_id)
        .bind(data.sort_order)
        .bind(data.is_active)
        .bind(data.is_system)
        .bind(data.gender)
        .bind(&data.singular_name)
        .bind(&data.plural_name)
        .bind(&data.default_unit)
        .bind(&data.slug)
        .bind(&data.full_path)
        .bind(data.show_in_sku)
        .bind(data.show_in_name)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to create category"))
    }

    /// Overwrite a category's writable fields. `is_system` is never changed here.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &CategoryData,
    ) -> AppResult<Option<Category>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            "UPDATE inventory_categories SET \
             name = $2, description = $3, icon = $4, color = $5, prefix = $6, parent_id = $7, \
             sort_order = $8, is_active = $9, gender = $10, singular_name = $11, plural_name = $12, \
             default_unit = $13, slug = $14, full_path = $15, show_in_sku = $16, show_in_name = $17, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.icon)
        .bind(&data.color)
        .bind(&data.prefix)
        .bind(data.parent_id)
        .bind(data.sort_order)
        .bind(data.is_active)
        .bind(data.gender)
        .bind(&data.singular_name)
        .bind(&data.plural_name)
        .bind(&data.default_unit)
        .bind(&data.slug)
        .bind(&data.full_path)
        .bind(data.show_in_sku)
        .bind(data.show_in_name)
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to update category"))
    }

    /// Flag a category as protected.
    pub async fn mark_system<'e, E>(&self, executor: E, id: Uuid) -> AppResult<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE inventory_categories SET is_system = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(db_err("Failed to protect category"))?;
        Ok(())
    }

    /// Store a recomputed full path.
    pub async fn update_full_path<'e, E>(&self, executor: E, id: Uuid, full_path: &str) -> AppResult<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE inventory_categories SET full_path = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(full_path)
            .execute(executor)
            .await
            .map_err(db_err("Failed to update category path"))?;
        Ok(())
    }

    /// Store a recomputed slug and full path.
    pub async fn update_slug_and_path<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        slug: &str,
        full_path: &str,
    ) -> AppResult<()>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE inventory_categories SET slug = $2, full_path = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(slug)
        .bind(full_path)
        .execute(executor)
        .await
        .map_err(db_err("Failed to update category slug"))?;
        Ok(())
    }

    /// Set a category's manual position.
    pub async fn update_sort_order<'e, E>(&self, executor: E, id: Uuid, sort_order: i32) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory_categories SET sort_order = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(sort_order)
        .execute(executor)
        .await
        .map_err(db_err("Failed to reorder category"))?;
        Ok(result.rows_affected())
    }

    /// Number of direct subcategories.
    pub async fn count_children(&self, id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory_categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count subcategories"))
    }

    /// Detach all items from a category.
    pub async fn unlink_items<'e, E>(&self, executor: E, id: Uuid) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory_items SET category_id = NULL, updated_at = NOW() WHERE category_id = $1",
        )
        .bind(id)
        .execute(executor)
        .await
        .map_err(db_err("Failed to unlink category items"))?;
        Ok(result.rows_affected())
    }

    /// Delete a category row.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_categories WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete category"))?;
        Ok(result.rows_affected() > 0)
    }
}
