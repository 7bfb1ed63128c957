//! Transactional stock operations.
//!
//! Each operation locks the item row, applies a [`plan`](super::plan) to the
//! affected stock rows, recomputes the item's cached total from those rows
//! and appends a ledger entry, all inside one database transaction. Audit
//! entries, cache invalidation and stock alerts run after commit.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{PgConnection, Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use warehouse_auth::{RbacEnforcer, WarehousePermission};
use warehouse_cache::keys;
use warehouse_core::error::AppError;
use warehouse_database::connection::commit;
use warehouse_database::repositories::item::ItemRepository;
use warehouse_database::repositories::location::LocationRepository;
use warehouse_database::repositories::stock::StockRepository;
use warehouse_database::repositories::transaction::TransactionRepository;
use warehouse_database::repositories::transfer::TransferRepository;
use warehouse_entity::item::InventoryItem;
use warehouse_entity::location::StorageLocation;
use warehouse_entity::stock::{CreateTransaction, CreateTransfer, StockWithLocation, TransactionKind};

use super::alerts::StockAlerts;
use super::plan::{self, AdjustMode};
use crate::audit::AuditService;
use crate::audit::service::TARGET_ITEM;
use crate::cache::WarehouseCache;
use crate::context::RequestContext;

/// Request to adjust an item's stock at one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustStockRequest {
    /// Amount to add, remove, or the target quantity for `Set`.
    pub amount: i32,
    /// How `amount` is applied.
    #[serde(rename = "type")]
    pub mode: AdjustMode,
    /// Why the stock changed.
    pub reason: String,
    /// Location to adjust; the default location when omitted.
    pub storage_location_id: Option<Uuid>,
    /// Unit cost recorded on the item.
    pub cost_price: Option<Decimal>,
}

/// Request to transfer stock between locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStockRequest {
    /// Source location.
    pub from_location_id: Uuid,
    /// Destination location.
    pub to_location_id: Uuid,
    /// Units to move.
    pub amount: i32,
    /// Why the stock moved.
    pub reason: Option<String>,
}

/// Request to move an item between locations with a transfer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveItemRequest {
    /// Source location.
    pub from_location_id: Uuid,
    /// Destination location.
    pub to_location_id: Uuid,
    /// Units to move.
    pub quantity: i32,
    /// Free-form comment.
    pub comment: Option<String>,
}

/// Request to consolidate many items at one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMoveRequest {
    /// Items to move.
    pub item_ids: Vec<Uuid>,
    /// Target location.
    pub target_location_id: Uuid,
    /// Why the items moved.
    pub comment: Option<String>,
}

/// Outcome of a bulk move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMoveSummary {
    /// Items consolidated at the target.
    pub moved: usize,
    /// Items missing or without stock elsewhere, left unchanged.
    pub skipped: usize,
}

/// Applies stock changes and keeps the ledger.
#[derive(Debug, Clone)]
pub struct LedgerService {
    /// Item repository.
    item_repo: Arc<ItemRepository>,
    /// Stock row repository.
    stock_repo: Arc<StockRepository>,
    /// Ledger repository.
    transaction_repo: Arc<TransactionRepository>,
    /// Transfer record repository.
    transfer_repo: Arc<TransferRepository>,
    /// Location repository.
    location_repo: Arc<LocationRepository>,
    /// Warehouse cache.
    cache: Arc<WarehouseCache>,
    /// Audit writer.
    audit: Arc<AuditService>,
    /// Stock alerts.
    alerts: Arc<StockAlerts>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
}

impl LedgerService {
    /// Creates a new ledger service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_repo: Arc<ItemRepository>,
        stock_repo: Arc<StockRepository>,
        transaction_repo: Arc<TransactionRepository>,
        transfer_repo: Arc<TransferRepository>,
        location_repo: Arc<LocationRepository>,
        cache: Arc<WarehouseCache>,
        audit: Arc<AuditService>,
        alerts: Arc<StockAlerts>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            item_repo,
            stock_repo,
            transaction_repo,
            transfer_repo,
            location_repo,
            cache,
            audit,
            alerts,
            rbac,
        }
    }

    /// Stock rows of an item with location names.
    pub async fn item_stocks(&self, item_id: Uuid) -> Result<Vec<StockWithLocation>, AppError> {
        self.cache
            .get_or_load(&keys::item_stocks(item_id), || {
                self.stock_repo.for_item(item_id)
            })
            .await
    }

    /// Adds, removes or sets stock at one location.
    pub async fn adjust_stock(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        req: AdjustStockRequest,
    ) -> Result<InventoryItem, AppError> {
        let reason = req.reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("Reason is required"));
        }
        if req.cost_price.is_some_and(|p| p.is_sign_negative()) {
            return Err(AppError::validation("Cost price cannot be negative"));
        }

        let mut tx = self.item_repo.begin().await?;

        let item = self.lock_item(&mut tx, item_id).await?;
        if item.is_archived {
            return Err(AppError::validation("Archived items cannot be adjusted"));
        }

        let location = match req.storage_location_id {
            Some(id) => self.require_location(&mut tx, id).await?,
            None => self
                .location_repo
                .find_default(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::validation(
                        "No storage location given and no default location is configured",
                    )
                })?,
        };

        let current = self
            .stock_repo
            .quantity_for_update(&mut *tx, item_id, location.id)
            .await?;

        let Some(plan) = plan::plan_adjustment(req.mode, req.amount, current)? else {
            return Ok(item);
        };

        self.stock_repo
            .set_quantity(&mut *tx, item_id, location.id, plan.new_quantity)
            .await?;

        let updated = self
            .refresh_totals(&mut tx, &item, req.cost_price)
            .await?;

        let ledger_reason = match req.mode {
            AdjustMode::Set => format!("Stock correction: {reason}"),
            AdjustMode::In | AdjustMode::Out => reason.to_string(),
        };
        self.transaction_repo
            .create(
                &mut *tx,
                &CreateTransaction {
                    item_id: Some(item_id),
                    change_amount: plan.delta,
                    kind: plan.kind,
                    reason: Some(ledger_reason),
                    storage_location_id: Some(location.id),
                    from_storage_location_id: None,
                    cost_price: req.cost_price,
                    created_by: Some(ctx.user_id),
                },
            )
            .await?;

        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            item_id = %item_id,
            location_id = %location.id,
            delta = plan.delta,
            quantity = updated.quantity,
            "Stock adjusted"
        );

        self.audit
            .log(
                ctx,
                "stock.adjust",
                TARGET_ITEM,
                Some(item_id),
                json!({
                    "mode": req.mode,
                    "amount": req.amount,
                    "delta": plan.delta,
                    "reason": reason,
                    "storage_location_id": location.id,
                }),
            )
            .await;
        self.after_change(ctx, &updated).await;

        Ok(updated)
    }

    /// Moves stock from one location to another.
    pub async fn transfer_stock(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        req: TransferStockRequest,
    ) -> Result<InventoryItem, AppError> {
        let note = req
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let updated = self
            .relocate(
                ctx,
                item_id,
                req.from_location_id,
                req.to_location_id,
                req.amount,
                note,
                false,
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            item_id = %item_id,
            from = %req.from_location_id,
            to = %req.to_location_id,
            amount = req.amount,
            "Stock transferred"
        );
        Ok(updated)
    }

    /// Moves stock between locations and records an inventory transfer.
    pub async fn move_item(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        req: MoveItemRequest,
    ) -> Result<InventoryItem, AppError> {
        let note = req
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let updated = self
            .relocate(
                ctx,
                item_id,
                req.from_location_id,
                req.to_location_id,
                req.quantity,
                note,
                true,
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            item_id = %item_id,
            from = %req.from_location_id,
            to = %req.to_location_id,
            quantity = req.quantity,
            "Item moved"
        );
        Ok(updated)
    }

    /// Consolidates every stock row of each item at the target location.
    pub async fn bulk_move(
        &self,
        ctx: &RequestContext,
        req: BulkMoveRequest,
    ) -> Result<BulkMoveSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::StockBulkMove)?;
        if req.item_ids.is_empty() {
            return Err(AppError::validation("No items selected"));
        }

        let mut tx = self.item_repo.begin().await?;
        let target = self.require_location(&mut tx, req.target_location_id).await?;
        let reason = match req.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(comment) => format!("Bulk move: {comment} (to {})", target.name),
            None => format!("Bulk move to {}", target.name),
        };

        let mut summary = BulkMoveSummary::default();
        let mut moved_items = Vec::new();

        for item_id in &req.item_ids {
            let Some(item) = self.item_repo.find_for_update(&mut *tx, *item_id).await? else {
                debug!(item_id = %item_id, "Bulk move skips a missing item");
                summary.skipped += 1;
                continue;
            };
            let rows = self
                .stock_repo
                .for_item_for_update(&mut *tx, item.id)
                .await?;

            let elsewhere = rows
                .iter()
                .any(|r| r.storage_location_id != target.id && r.quantity > 0);
            let quantities: Vec<i32> = rows.iter().map(|r| r.quantity).collect();
            let Some(total) = plan::consolidate(&quantities).filter(|_| elsewhere) else {
                summary.skipped += 1;
                continue;
            };

            self.stock_repo
                .set_quantity(&mut *tx, item.id, target.id, total)
                .await?;
            self.stock_repo
                .delete_other_locations(&mut *tx, item.id, target.id)
                .await?;
            let updated = self.refresh_totals(&mut tx, &item, None).await?;

            self.transaction_repo
                .create(
                    &mut *tx,
                    &CreateTransaction {
                        item_id: Some(item.id),
                        change_amount: total,
                        kind: TransactionKind::Transfer,
                        reason: Some(reason.clone()),
                        storage_location_id: Some(target.id),
                        from_storage_location_id: None,
                        cost_price: None,
                        created_by: Some(ctx.user_id),
                    },
                )
                .await?;

            summary.moved += 1;
            moved_items.push(updated);
        }

        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            target = %target.id,
            moved = summary.moved,
            skipped = summary.skipped,
            "Bulk move completed"
        );

        self.audit
            .log(
                ctx,
                "stock.bulk_move",
                TARGET_ITEM,
                None,
                json!({
                    "item_ids": req.item_ids,
                    "target_location_id": target.id,
                    "moved": summary.moved,
                    "skipped": summary.skipped,
                }),
            )
            .await;
        self.cache.invalidate().await;
        for item in &moved_items {
            self.alerts.check(ctx, item).await;
        }

        Ok(summary)
    }

    /// Recomputes every item's cached quantity from its stock rows.
    pub async fn sync_quantities(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::StockSync)?;

        let mut tx = self.item_repo.begin().await?;
        let changed = self.item_repo.sync_totals(&mut *tx).await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, changed, "Item quantities synchronized");
        self.audit
            .log(ctx, "stock.sync", TARGET_ITEM, None, json!({ "changed": changed }))
            .await;
        self.cache.invalidate().await;

        Ok(changed)
    }

    /// Receives the initial stock of a freshly created item inside the
    /// caller's transaction.
    pub(crate) async fn receive_initial(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        ctx: &RequestContext,
        item: &InventoryItem,
        location_id: Uuid,
        quantity: i32,
    ) -> Result<InventoryItem, AppError> {
        let location = self.require_location(tx, location_id).await?;
        let Some(plan) = plan::plan_adjustment(AdjustMode::In, quantity, 0)? else {
            return Ok(item.clone());
        };

        self.stock_repo
            .set_quantity(&mut **tx, item.id, location.id, plan.new_quantity)
            .await?;
        let updated = self.refresh_totals(tx, item, None).await?;

        self.transaction_repo
            .create(
                &mut **tx,
                &CreateTransaction {
                    item_id: Some(item.id),
                    change_amount: plan.delta,
                    kind: TransactionKind::In,
                    reason: Some("Initial stock".to_string()),
                    storage_location_id: Some(location.id),
                    from_storage_location_id: None,
                    cost_price: item.cost_price,
                    created_by: Some(ctx.user_id),
                },
            )
            .await?;

        Ok(updated)
    }

    /// Shared body of transfers and moves.
    #[allow(clippy::too_many_arguments)]
    async fn relocate(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        from: Uuid,
        to: Uuid,
        amount: i32,
        note: Option<String>,
        record_transfer: bool,
    ) -> Result<InventoryItem, AppError> {
        if from == to {
            return Err(AppError::validation(
                "Source and destination locations must differ",
            ));
        }

        let mut tx = self.item_repo.begin().await?;

        let item = self.lock_item(&mut tx, item_id).await?;
        let source = self.require_location(&mut tx, from).await?;
        let destination = self.require_location(&mut tx, to).await?;

        let source_qty = self
            .stock_repo
            .quantity_for_update(&mut *tx, item_id, from)
            .await?;
        let destination_qty = self
            .stock_repo
            .quantity_for_update(&mut *tx, item_id, to)
            .await?;

        let plan = plan::plan_transfer(from, to, amount, source_qty, destination_qty)?;

        self.stock_repo
            .set_quantity(&mut *tx, item_id, from, plan.source_quantity)
            .await?;
        self.stock_repo
            .set_quantity(&mut *tx, item_id, to, plan.destination_quantity)
            .await?;

        let updated = self.refresh_totals(&mut tx, &item, None).await?;

        let mut reason = format!(
            "Transfer from «{}» to «{}»",
            source.name, destination.name
        );
        if let Some(ref note) = note {
            reason.push_str(&format!(". Reason: {note}"));
        }

        if record_transfer {
            self.transfer_repo
                .create(
                    &mut *tx,
                    &CreateTransfer {
                        item_id,
                        from_location_id: from,
                        to_location_id: to,
                        quantity: amount,
                        comment: note.clone(),
                        created_by: ctx.user_id,
                    },
                )
                .await?;
        }

        self.transaction_repo
            .create(
                &mut *tx,
                &CreateTransaction {
                    item_id: Some(item_id),
                    change_amount: amount,
                    kind: TransactionKind::Transfer,
                    reason: Some(reason),
                    storage_location_id: Some(to),
                    from_storage_location_id: Some(from),
                    cost_price: None,
                    created_by: Some(ctx.user_id),
                },
            )
            .await?;

        commit(tx).await?;

        let action = if record_transfer { "stock.move" } else { "stock.transfer" };
        self.audit
            .log(
                ctx,
                action,
                TARGET_ITEM,
                Some(item_id),
                json!({
                    "from_location_id": from,
                    "to_location_id": to,
                    "amount": amount,
                    "note": note,
                }),
            )
            .await;
        self.after_change(ctx, &updated).await;

        Ok(updated)
    }

    /// Recomputes the cached total of `item` from its rows and stores it.
    async fn refresh_totals(
        &self,
        tx: &mut PgConnection,
        item: &InventoryItem,
        cost_price: Option<Decimal>,
    ) -> Result<InventoryItem, AppError> {
        let total = self.stock_repo.sum_for_item(&mut *tx, item.id).await?;
        let zero_since = plan::zero_stock_since(total, item.zero_stock_since, Utc::now());
        self.item_repo
            .set_totals(&mut *tx, item.id, total, zero_since, cost_price)
            .await
    }

    async fn lock_item(&self, tx: &mut PgConnection, item_id: Uuid) -> Result<InventoryItem, AppError> {
        self.item_repo
            .find_for_update(tx, item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found")))
    }

    async fn require_location(
        &self,
        tx: &mut PgConnection,
        location_id: Uuid,
    ) -> Result<StorageLocation, AppError> {
        self.location_repo
            .find_by_id(tx, location_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Storage location {location_id} not found")))
    }

    async fn after_change(&self, ctx: &RequestContext, item: &InventoryItem) {
        self.cache.invalidate().await;
        self.alerts.check(ctx, item).await;
    }
}
