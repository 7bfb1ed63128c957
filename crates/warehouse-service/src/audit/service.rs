//! Audit log writer used after committed mutations.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use warehouse_core::error::AppError;
use warehouse_core::types::pagination::{PageRequest, PageResponse};
use warehouse_database::repositories::audit::AuditLogRepository;
use warehouse_entity::audit::{AuditFilter, AuditLogEntry, CreateAuditLogEntry};

use crate::context::RequestContext;

/// Audit target type for inventory items.
pub const TARGET_ITEM: &str = "inventory_item";
/// Audit target type for categories.
pub const TARGET_CATEGORY: &str = "inventory_category";
/// Audit target type for attribute dictionaries.
pub const TARGET_ATTRIBUTE: &str = "inventory_attribute";
/// Audit target type for storage locations.
pub const TARGET_LOCATION: &str = "storage_location";
/// Audit target type for ledger entries.
pub const TARGET_TRANSACTION: &str = "inventory_transaction";

/// General audit log service.
#[derive(Debug, Clone)]
pub struct AuditService {
    /// Audit log repository.
    audit_repo: Arc<AuditLogRepository>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_repo }
    }

    /// Records an audit event. A failed write is logged and swallowed because
    /// the audited change has already been committed.
    pub async fn log(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_type: &str,
        target_id: Option<Uuid>,
        details: serde_json::Value,
    ) {
        let entry = CreateAuditLogEntry {
            actor_id: Some(ctx.user_id),
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id,
            details: Some(details),
            ip_address: ctx.ip_address.clone(),
        };

        if let Err(e) = self.audit_repo.create(&entry).await {
            warn!(
                user_id = %ctx.user_id,
                action = %action,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// Searches the audit log.
    pub async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<AuditLogEntry>, AppError> {
        self.audit_repo.search(filter, &page.normalized()).await
    }
}
