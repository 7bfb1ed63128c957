//! Attribute type and attribute repository implementation.

use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use warehouse_core::result::AppResult;
use warehouse_entity::attribute::{
    Attribute, AttributeData, AttributeType, AttributeTypeData, FixedSlot,
};

use super::db_err;

/// Repository for attribute dictionaries.
#[derive(Debug, Clone)]
pub struct AttributeRepository {
    pool: PgPool,
}

impl AttributeRepository {
    /// Create a new attribute repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a transaction on this repository's pool.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        crate::connection::begin(&self.pool).await
    }

    // ── Types ────────────────────────────────────────────────────────

    /// All attribute types in generator order.
    pub async fn list_types(&self) -> AppResult<Vec<AttributeType>> {
        sqlx::query_as::<_, AttributeType>(
            "SELECT * FROM inventory_attribute_types ORDER BY sort_order, created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list attribute types"))
    }

    /// Find a type by ID.
    pub async fn find_type(&self, id: Uuid) -> AppResult<Option<AttributeType>> {
        sqlx::query_as::<_, AttributeType>("SELECT * FROM inventory_attribute_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find attribute type"))
    }

    /// Find a type by slug.
    pub async fn find_type_by_slug(&self, slug: &str) -> AppResult<Option<AttributeType>> {
        sqlx::query_as::<_, AttributeType>(
            "SELECT * FROM inventory_attribute_types WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find attribute type"))
    }

    /// Insert a type.
    pub async fn create_type<'e, E>(
        &self,
        executor: E,
        data: &AttributeTypeData,
    ) -> AppResult<AttributeType>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AttributeType>(
            "INSERT INTO inventory_attribute_types \
             (slug, name, is_system, sort_order, category_id, show_in_sku, show_in_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.slug)
        .bind(&data.name)
        .bind(data.is_system)
        .bind(data.sort_order)
        .bind(data.category_id)
        .bind(data.show_in_sku)
        .bind(data.show_in_name)
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to create attribute type"))
    }

    /// Update a type. A slug change cascades to its attributes.
    pub async fn update_type<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &AttributeTypeData,
    ) -> AppResult<Option<AttributeType>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AttributeType>(
            "UPDATE inventory_attribute_types SET slug = $2, name = $3, sort_order = $4, \
             category_id = $5, show_in_sku = $6, show_in_name = $7, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.slug)
        .bind(&data.name)
        .bind(data.sort_order)
        .bind(data.category_id)
        .bind(data.show_in_sku)
        .bind(data.show_in_name)
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to update attribute type"))
    }

    /// Delete a type.
    pub async fn delete_type<'e, E>(&self, executor: E, id: Uuid) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_attribute_types WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete attribute type"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of attributes belonging to a type.
    pub async fn count_attributes_of_type(&self, slug: &str) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_attributes WHERE type_slug = $1",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count attributes"))
    }

    // ── Attributes ───────────────────────────────────────────────────

    /// All attributes, optionally of one type.
    pub async fn list_attributes(&self, type_slug: Option<&str>) -> AppResult<Vec<Attribute>> {
        sqlx::query_as::<_, Attribute>(
            "SELECT * FROM inventory_attributes \
             WHERE ($1::TEXT IS NULL OR type_slug = $1) \
             ORDER BY type_slug, name",
        )
        .bind(type_slug)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list attributes"))
    }

    /// Find an attribute by ID.
    pub async fn find_attribute(&self, id: Uuid) -> AppResult<Option<Attribute>> {
        sqlx::query_as::<_, Attribute>("SELECT * FROM inventory_attributes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find attribute"))
    }

    /// Insert an attribute.
    pub async fn create_attribute<'e, E>(
        &self,
        executor: E,
        data: &AttributeData,
    ) -> AppResult<Attribute>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Attribute>(
            "INSERT INTO inventory_attributes (type_slug, name, code, meta) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.type_slug)
        .bind(&data.name)
        .bind(&data.code)
        .bind(Json(&data.meta))
        .fetch_one(executor)
        .await
        .map_err(db_err("Failed to create attribute"))
    }

    /// Insert an attribute unless one with the same type and code exists.
    pub async fn insert_attribute_if_missing<'e, E>(
        &self,
        executor: E,
        data: &AttributeData,
    ) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "INSERT INTO inventory_attributes (type_slug, name, code, meta) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (type_slug, code) DO NOTHING",
        )
        .bind(&data.type_slug)
        .bind(&data.name)
        .bind(&data.code)
        .bind(Json(&data.meta))
        .execute(executor)
        .await
        .map_err(db_err("Failed to seed attribute"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Update an attribute's name, code and metadata.
    pub async fn update_attribute<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        data: &AttributeData,
    ) -> AppResult<Option<Attribute>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Attribute>(
            "UPDATE inventory_attributes SET name = $2, code = $3, meta = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.code)
        .bind(Json(&data.meta))
        .fetch_optional(executor)
        .await
        .map_err(db_err("Failed to update attribute"))
    }

    /// Delete an attribute.
    pub async fn delete_attribute<'e, E>(&self, executor: E, id: Uuid) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM inventory_attributes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(db_err("Failed to delete attribute"))?;
        Ok(result.rows_affected() > 0)
    }

    // ── Item usage ───────────────────────────────────────────────────

    /// Number of items carrying `code` for the type `type_slug`.
    pub async fn count_items_using(&self, type_slug: &str, code: &str) -> AppResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM inventory_items WHERE {}",
            usage_condition(type_slug)
        );
        bind_usage(sqlx::query_scalar::<_, i64>(&sql), type_slug)
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count attribute usage"))
    }

    /// IDs of items carrying `code` for the type `type_slug`.
    pub async fn items_using<'e, E>(
        &self,
        executor: E,
        type_slug: &str,
        code: &str,
    ) -> AppResult<Vec<Uuid>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT id FROM inventory_items WHERE {}",
            usage_condition(type_slug)
        );
        bind_usage(sqlx::query_scalar::<_, Uuid>(&sql), type_slug)
            .bind(code)
            .fetch_all(executor)
            .await
            .map_err(db_err("Failed to find items using attribute"))
    }

    /// Replace `old_code` with `new_code` on every item of the given type.
    pub async fn replace_code_on_items<'e, E>(
        &self,
        executor: E,
        type_slug: &str,
        old_code: &str,
        new_code: &str,
    ) -> AppResult<u64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = FixedSlot::from_type_slug(type_slug);
        let sql = match slot {
            Some(slot) => {
                let column = slot.item_column();
                format!("UPDATE inventory_items SET {column} = $2, updated_at = NOW() WHERE {column} = $1")
            }
            None => "UPDATE inventory_items \
                     SET attributes = jsonb_set(attributes, ARRAY[$3], to_jsonb($2::TEXT)), \
                         updated_at = NOW() \
                     WHERE attributes ->> $3 = $1"
                .to_string(),
        };
        let mut query = sqlx::query(&sql).bind(old_code).bind(new_code);
        if slot.is_none() {
            query = query.bind(type_slug);
        }
        let result = query
            .execute(executor)
            .await
            .map_err(db_err("Failed to replace attribute code on items"))?;
        Ok(result.rows_affected())
    }
}

/// WHERE condition matching items that carry a code (always the last
/// parameter) for `type_slug`. Custom types bind the slug as `$1`.
fn usage_condition(type_slug: &str) -> String {
    match FixedSlot::from_type_slug(type_slug) {
        Some(slot) => format!("{} = $1", slot.item_column()),
        None => "attributes ->> $1 = $2".to_string(),
    }
}

fn bind_usage<'q, O>(
    query: sqlx::query::QueryScalar<'q, Postgres, O, sqlx::postgres::PgArguments>,
    type_slug: &str,
) -> sqlx::query::QueryScalar<'q, Postgres, O, sqlx::postgres::PgArguments> {
    match FixedSlot::from_type_slug(type_slug) {
        Some(_) => query,
        None => query.bind(type_slug.to_string()),
    }
}
