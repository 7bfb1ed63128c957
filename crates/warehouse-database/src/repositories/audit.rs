//! Audit log persistence.

use sqlx::{PgPool, Postgres, QueryBuilder};

use warehouse_core::result::AppResult;
use warehouse_core::types::pagination::{PageRequest, PageResponse};
use warehouse_entity::audit::{AuditFilter, AuditLogEntry, CreateAuditLogEntry};

use super::db_err;

const ENTRY_COLUMNS: &str = "a.id, a.actor_id, u.display_name AS actor_name, a.action, \
     a.target_type, a.target_id, a.details, a.ip_address, a.created_at";

/// Append-only store of [`AuditLogEntry`] rows.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered entries, newest first.
    pub async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM audit_log a");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count audit entries"))?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM audit_log a LEFT JOIN users u ON u.id = a.actor_id"
        ));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let entries = select
            .build_query_as::<AuditLogEntry>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to search audit log"))?;

        Ok(PageResponse::new(entries, page, total.max(0) as u64))
    }

    /// Appends an entry.
    pub async fn create(&self, data: &CreateAuditLogEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO audit_log (actor_id, action, target_type, target_id, details, ip_address) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(data.actor_id)
        .bind(&data.action)
        .bind(&data.target_type)
        .bind(data.target_id)
        .bind(&data.details)
        .bind(&data.ip_address)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to write audit entry"))?;
        Ok(())
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &AuditFilter) {
    let mut clause = " WHERE ";
    let mut next = |query: &mut QueryBuilder<'_, Postgres>| {
        query.push(clause);
        clause = " AND ";
    };

    if let Some(actor_id) = filter.actor_id {
        next(query);
        query.push("a.actor_id = ").push_bind(actor_id);
    }
    if let Some((exact, nested)) = filter.action_patterns() {
        next(query);
        query
            .push("(a.action = ")
            .push_bind(exact)
            .push(" OR a.action LIKE ")
            .push_bind(nested)
            .push(")");
    }
    if let Some(target_type) = filter.target_type.as_deref().filter(|t| !t.is_empty()) {
        next(query);
        query.push("a.target_type = ").push_bind(target_type.to_string());
    }
    if let Some(target_id) = filter.target_id {
        next(query);
        query.push("a.target_id = ").push_bind(target_id);
    }
}
