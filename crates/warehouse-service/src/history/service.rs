//! Ledger history views and maintenance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use warehouse_auth::{RbacEnforcer, WarehousePermission};
use warehouse_core::error::AppError;
use warehouse_core::types::pagination::{PageRequest, PageResponse};
use warehouse_database::connection::{begin, commit};
use warehouse_database::repositories::transaction::TransactionRepository;
use warehouse_entity::audit::{AuditFilter, AuditLogEntry};
use warehouse_entity::stock::{TransactionKind, TransactionView};

use crate::audit::AuditService;
use crate::audit::service::TARGET_TRANSACTION;
use crate::cache::WarehouseCache;
use crate::context::RequestContext;

/// Filters for the ledger history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Only entries of this item.
    #[serde(default)]
    pub item_id: Option<Uuid>,
    /// Only entries of this kind.
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
}

/// Reads and prunes the inventory ledger.
#[derive(Debug, Clone)]
pub struct HistoryService {
    /// Ledger repository.
    transaction_repo: Arc<TransactionRepository>,
    /// Audit writer and reader.
    audit: Arc<AuditService>,
    /// Warehouse cache.
    cache: Arc<WarehouseCache>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
}

impl HistoryService {
    /// Creates a new history service.
    pub fn new(
        transaction_repo: Arc<TransactionRepository>,
        audit: Arc<AuditService>,
        cache: Arc<WarehouseCache>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            transaction_repo,
            audit,
            cache,
            rbac,
        }
    }

    /// Ledger entries, newest first.
    pub async fn history(
        &self,
        filter: &HistoryFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<TransactionView>, AppError> {
        self.transaction_repo
            .search(filter.item_id, filter.kind, &page.normalized())
            .await
    }

    /// Ledger entries of one item, newest first.
    pub async fn item_history(
        &self,
        item_id: Uuid,
        page: &PageRequest,
    ) -> Result<PageResponse<TransactionView>, AppError> {
        self.transaction_repo
            .search(Some(item_id), None, &page.normalized())
            .await
    }

    /// Audit log entries, newest first.
    pub async fn audit_log(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<AuditLogEntry>, AppError> {
        self.audit.search(filter, page).await
    }

    /// Deletes selected ledger entries.
    pub async fn delete_transactions(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
    ) -> Result<u64, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::HistoryDelete)?;
        if ids.is_empty() {
            return Err(AppError::validation("No history entries selected"));
        }

        let mut tx = begin(self.transaction_repo.pool()).await?;
        let deleted = self.transaction_repo.delete_many(&mut *tx, ids).await?;
        commit(tx).await?;

        warn!(user_id = %ctx.user_id, deleted, "Ledger entries deleted");
        self.audit
            .log(
                ctx,
                "history.delete",
                TARGET_TRANSACTION,
                None,
                json!({ "count": deleted, "ids": ids }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(deleted)
    }

    /// Deletes the entire ledger.
    pub async fn clear_history(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::HistoryDelete)?;

        let mut tx = begin(self.transaction_repo.pool()).await?;
        let deleted = self.transaction_repo.clear(&mut *tx).await?;
        commit(tx).await?;

        warn!(user_id = %ctx.user_id, deleted, "Ledger cleared");
        self.audit
            .log(
                ctx,
                "history.clear",
                TARGET_TRANSACTION,
                None,
                json!({ "count": deleted }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_filter_reads_type_key() {
        let filter: HistoryFilter =
            serde_json::from_value(json!({ "type": "attribute_change" })).unwrap();
        assert_eq!(filter.kind, Some(TransactionKind::AttributeChange));
        assert_eq!(filter.item_id, None);

        let empty: HistoryFilter = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.kind, None);
    }
}
