//! Post-commit stock level alerts.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use warehouse_entity::item::{InventoryItem, StockLevel};

use crate::audit::AuditService;
use crate::audit::service::TARGET_ITEM;
use crate::context::RequestContext;

/// Audit action written for items that need attention.
pub const STOCK_ALERT_ACTION: &str = "stock.alert";

/// Raises alerts for items whose stock fell to a threshold.
#[derive(Debug, Clone)]
pub struct StockAlerts {
    /// Audit writer.
    audit: Arc<AuditService>,
}

impl StockAlerts {
    /// Creates a new alert checker.
    pub fn new(audit: Arc<AuditService>) -> Self {
        Self { audit }
    }

    /// Classify `item` and record an alert when it is not at a normal level.
    pub async fn check(&self, ctx: &RequestContext, item: &InventoryItem) -> StockLevel {
        let level = item.stock_level();
        if level.needs_attention() && !item.is_archived {
            warn!(
                item_id = %item.id,
                sku = item.sku.as_deref().unwrap_or(""),
                quantity = item.quantity,
                level = ?level,
                "Stock level alert"
            );
            self.audit
                .log(
                    ctx,
                    STOCK_ALERT_ACTION,
                    TARGET_ITEM,
                    Some(item.id),
                    json!({
                        "level": level,
                        "quantity": item.quantity,
                        "low_stock_threshold": item.low_stock_threshold,
                        "critical_stock_threshold": item.critical_stock_threshold,
                    }),
                )
                .await;
        }
        level
    }
}
