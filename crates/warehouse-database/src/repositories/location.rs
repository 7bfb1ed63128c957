//! Storage location repository implementation.

use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use warehouse_core::result::AppResult;
use warehouse_entity::location::{LocationData, StorageLocation};

use super::db_err;

/// Repository for storage locations.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Create a new location repository.
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

    /// All locations, positioned ones first.
    pub async fn list(&self) -> AppResult<Vec<StorageLocation>> {
        sqlx::query_as::<_, StorageLocation>(
            "SELECT * FROM storage_locations ORDER BY (sort_order = 0), sort_order, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list storage locations"))
    }

    /// Find a location by ID.
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> AppResult<Option<StorageLocation>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, StorageLocation>("SELECT * FROM storage_locations WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(db_err("Failed to find storage location"))
    }

    /// Find a location by exact name.
    pub async fn find_by_name<'e, E>(&self, executor: E, name: &str) -> AppResult<Option<StorageLocation>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, StorageLocation>(
            "SELECT * FROM storage_locations WHERE name = $1 LIMIT 1",
        )
        .bind(name)
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to find storage location"))
    }

    /// The location flagged as default.
    pub async fn find_default<'e, E>(&self, executor: E) -> AppResult<Option<StorageLocation>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, StorageLocation>(
            "SELECT * FROM storage_locations WHERE is_default LIMIT 1",
        )
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to find default storage location"))
    }

    /// Display name of a user, for the responsible-user column.
    pub async fn user_display_name(&self, user_id: Uuid) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT display_name FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find responsible user"))
    }

    /// Drop the default flag from every location except `keep`.
    pub async fn clear_default<'e, E>(&self, executor: E, keep: Option<Uuid>) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE storage_locations SET is_default = FALSE, updated_at = NOW() \
             WHERE is_default AND ($1::UUID IS NULL OR id <> $1)",
        )
        .bind(keep)
        .execute(executor)
        .await
        .map_err(db_err("Failed to clear default storage location"))?;
        Ok(result.rows_affected())
    }

    /// Insert a location.
    pub async fn create<'e, E>(&self, executor: E, data: &LocationData) -> AppResult<StorageLocation>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, StorageLocation>(
            "INSERT INTO storage_locations \
             (name, address, description, responsible_user_id, type, is_system, is_default, is_active, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.description)
        .bind(data.responsible_user_id)
        .bind(data.kind)
        .bind(data.is_system)
        .bind(data.is_default)
        .bind(data.is_active)
        .bind(data.sort_order)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to create storage location"))
    }

    /// Overwrite a location's writable fields. `is_system` is never changed here.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &LocationData,
    ) -> AppResult<Option<StorageLocation>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, StorageLocation>(
            "UPDATE storage_locations SET name = $2, address = $3, description = $4, \
             responsible_user_id = $5, type = $6, is_default = $7, is_active = $8, sort_order = $9, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.description)
        .bind(data.responsible_user_id)
        .bind(data.kind)
        .bind(data.is_default)
        .bind(data.is_active)
        .bind(data.sort_order)
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to update storage location"))
    }

    /// Set a location's manual position.
    pub async fn update_sort_order<'e, E>(&self, executor: E, id: Uuid, sort_order: i32) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE storage_locations SET sort_order = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(sort_order)
        .execute(executor)
        .await
        .map_err(db_err("Failed to reorder storage location"))?;
        Ok(result.rows_affected())
    }

    /// Delete a location row.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM storage_locations WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete storage location"))?;
        Ok(result.rows_affected() > 0)
    }
}
