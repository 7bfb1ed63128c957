//! Inventory item lifecycle: creation, editing, archiving and deletion.

use std::sync::Arc;

use chrono::{Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use warehouse_auth::{PasswordConfirmation, RbacEnforcer, WarehousePermission};
use warehouse_core::config::InventoryConfig;
use warehouse_core::error::AppError;
use warehouse_core::types::pagination::{PageRequest, PageResponse};
use warehouse_database::connection::commit;
use warehouse_database::repositories::category::CategoryRepository;
use warehouse_database::repositories::item::ItemRepository;
use warehouse_database::repositories::location::LocationRepository;
use warehouse_database::repositories::stock::StockRepository;
use warehouse_database::repositories::transaction::TransactionRepository;
use warehouse_entity::attribute::FixedSlot;
use warehouse_entity::category::Category;
use warehouse_entity::item::{
    AttributeCodes, InventoryItem, ItemData, ItemFilter, ItemSummary, ItemType,
};
use warehouse_entity::stock::{CreateTransaction, TransactionKind};

use super::duplicate::{DuplicateMatch, find_duplicate};
use crate::attribute::AttributeService;
use crate::audit::AuditService;
use crate::audit::service::TARGET_ITEM;
use crate::cache::WarehouseCache;
use crate::context::RequestContext;
use crate::sku::{Generated, generate};
use crate::stock::{LedgerService, StockAlerts};

/// Unit forced on clothing and used when nothing else is given.
pub const PIECES: &str = "шт.";

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn empty_array() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

/// Outcome of regenerating SKUs and names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerateSummary {
    /// Items whose SKU or name changed.
    pub updated: usize,
    /// Categorized items inspected.
    pub total: usize,
}

/// Request to create or update an item.
///
/// A blank `name` or `sku` is generated from the category and attribute
/// codes when the category allows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Stock-keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Category.
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Kind of item.
    #[serde(default)]
    pub item_type: ItemType,
    /// Unit of measure.
    #[serde(default)]
    pub unit: Option<String>,
    /// Low-stock threshold; configured default when absent.
    #[serde(default)]
    pub low_stock_threshold: Option<i32>,
    /// Critical-stock threshold; configured default when absent.
    #[serde(default)]
    pub critical_stock_threshold: Option<i32>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Brand code.
    #[serde(default)]
    pub brand_code: Option<String>,
    /// Quality code.
    #[serde(default)]
    pub quality_code: Option<String>,
    /// Material code.
    #[serde(default)]
    pub material_code: Option<String>,
    /// Color code.
    #[serde(default)]
    pub color_code: Option<String>,
    /// Size code.
    #[serde(default)]
    pub size_code: Option<String>,
    /// Custom attribute codes keyed by type slug.
    #[serde(default = "empty_object")]
    pub attributes: serde_json::Value,
    /// Front image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Back image URL.
    #[serde(default)]
    pub image_back: Option<String>,
    /// Side image URL.
    #[serde(default)]
    pub image_side: Option<String>,
    /// Detail image URLs.
    #[serde(default = "empty_array")]
    pub image_details: serde_json::Value,
    /// Purchase price.
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    /// Selling price.
    #[serde(default)]
    pub selling_price: Option<Decimal>,
    /// Initial quantity, only read on create.
    #[serde(default)]
    pub quantity: i32,
    /// Location of the initial quantity; the default location when absent.
    #[serde(default)]
    pub storage_location_id: Option<Uuid>,
}

/// Result of a duplicate check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateCheck {
    /// The best match, if any.
    pub duplicate: Option<DuplicateMatch>,
}

/// Manages inventory items.
#[derive(Debug, Clone)]
pub struct ItemService {
    /// Item repository.
    item_repo: Arc<ItemRepository>,
    /// Category repository.
    category_repo: Arc<CategoryRepository>,
    /// Location repository.
    location_repo: Arc<LocationRepository>,
    /// Stock row repository.
    stock_repo: Arc<StockRepository>,
    /// Ledger repository.
    transaction_repo: Arc<TransactionRepository>,
    /// Attribute dictionaries.
    attributes: Arc<AttributeService>,
    /// Ledger, for initial stock.
    ledger: Arc<LedgerService>,
    /// Warehouse cache.
    cache: Arc<WarehouseCache>,
    /// Audit writer.
    audit: Arc<AuditService>,
    /// Stock alerts.
    alerts: Arc<StockAlerts>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
    /// Password re-confirmation.
    confirmation: Arc<PasswordConfirmation>,
    /// Inventory tunables.
    config: InventoryConfig,
}

impl ItemService {
    /// Creates a new item service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_repo: Arc<ItemRepository>,
        category_repo: Arc<CategoryRepository>,
        location_repo: Arc<LocationRepository>,
        stock_repo: Arc<StockRepository>,
        transaction_repo: Arc<TransactionRepository>,
        attributes: Arc<AttributeService>,
        ledger: Arc<LedgerService>,
        cache: Arc<WarehouseCache>,
        audit: Arc<AuditService>,
        alerts: Arc<StockAlerts>,
        rbac: Arc<RbacEnforcer>,
        confirmation: Arc<PasswordConfirmation>,
        config: InventoryConfig,
    ) -> Self {
        Self {
            item_repo,
            category_repo,
            location_repo,
            stock_repo,
            transaction_repo,
            attributes,
            ledger,
            cache,
            audit,
            alerts,
            rbac,
            confirmation,
            config,
        }
    }

    /// Lists items matching `filter`.
    pub async fn list_items(
        &self,
        filter: &ItemFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<ItemSummary>, AppError> {
        self.item_repo.search(filter, &page.normalized()).await
    }

    /// Gets an item by ID.
    pub async fn get_item(&self, id: Uuid) -> Result<InventoryItem, AppError> {
        self.item_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))
    }

    /// Finds an item by SKU, ignoring case.
    pub async fn find_by_sku(&self, sku: &str) -> Result<InventoryItem, AppError> {
        self.item_repo
            .find_by_sku(sku, None)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No item with SKU '{sku}'")))
    }

    /// Number of active items without a category.
    pub async fn orphaned_count(&self) -> Result<i64, AppError> {
        self.item_repo.orphaned_count().await
    }

    /// Looks for an existing item with the same SKU or a similar name.
    pub async fn check_duplicate(
        &self,
        name: &str,
        sku: Option<&str>,
        exclude_id: Option<Uuid>,
    ) -> Result<DuplicateCheck, AppError> {
        let candidates = self.item_repo.name_candidates(exclude_id).await?;
        let duplicate = find_duplicate(
            &candidates,
            name,
            sku,
            self.config.duplicate_name_threshold,
        );
        Ok(DuplicateCheck { duplicate })
    }

    /// Creates an item, receiving its initial quantity in the same
    /// transaction.
    pub async fn create_item(
        &self,
        ctx: &RequestContext,
        req: ItemRequest,
    ) -> Result<InventoryItem, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemWrite)?;
        validate_request(&req)?;
        if req.quantity < 0 {
            return Err(AppError::validation("Initial quantity cannot be negative"));
        }

        let category = self.find_category(req.category_id).await?;
        let mut data = self.item_data(&req, category.as_ref());
        let generated = self.generate_for(&data, category.as_ref()).await?;
        let (name, sku) = resolve_identity(&req, generated.as_ref(), None)?;
        data.name = name;
        data.sku = sku;
        self.ensure_unique_sku(data.sku.as_deref(), None).await?;

        let mut tx = self.item_repo.begin().await?;
        let mut item = self.item_repo.create(&mut *tx, &data).await?;
        if req.quantity > 0 {
            let location_id = match req.storage_location_id {
                Some(id) => id,
                None => self
                    .location_repo
                    .find_default(&mut *tx)
                    .await?
                    .map(|l| l.id)
                    .ok_or_else(|| {
                        AppError::validation("Select a storage location for the initial stock")
                    })?,
            };
            item = self
                .ledger
                .receive_initial(&mut tx, ctx, &item, location_id, req.quantity)
                .await?;
        }
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            item_id = %item.id,
            sku = ?item.sku,
            quantity = item.quantity,
            "Item created"
        );
        self.audit
            .log(
                ctx,
                "item.create",
                TARGET_ITEM,
                Some(item.id),
                json!({
                    "name": item.name,
                    "sku": item.sku,
                    "quantity": item.quantity,
                    "storage_location_id": req.storage_location_id,
                }),
            )
            .await;
        self.cache.invalidate().await;
        self.alerts.check(ctx, &item).await;

        Ok(item)
    }

    /// Updates an item's descriptive fields and codes. Quantities only change
    /// through the ledger.
    pub async fn update_item(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: ItemRequest,
    ) -> Result<InventoryItem, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemWrite)?;
        validate_request(&req)?;

        let existing = self.get_item(id).await?;
        let category = self.find_category(req.category_id).await?;
        let mut data = self.item_data(&req, category.as_ref());
        if existing.item_type == ItemType::Clothing {
            data.unit = PIECES.to_string();
        }

        let generated = if identity_inputs_changed(&existing, &data) {
            self.generate_for(&data, category.as_ref()).await?
        } else {
            None
        };
        let (name, sku) = resolve_identity(&req, generated.as_ref(), Some(&existing))?;
        data.name = name;
        data.sku = sku;
        self.ensure_unique_sku(data.sku.as_deref(), Some(id)).await?;

        let mut tx = self.item_repo.begin().await?;
        let updated = self
            .item_repo
            .update(&mut *tx, id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, item_id = %id, sku = ?updated.sku, "Item updated");
        self.audit
            .log(
                ctx,
                "item.update",
                TARGET_ITEM,
                Some(id),
                json!({
                    "name": updated.name,
                    "old_sku": existing.sku,
                    "new_sku": updated.sku,
                    "category_id": updated.category_id,
                }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(updated)
    }

    /// Archives items that hold no stock.
    pub async fn archive_items(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
        reason: &str,
    ) -> Result<usize, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemArchive)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("Archive reason is required"));
        }
        self.archive(ctx, ids, reason).await
    }

    /// Brings archived items back.
    pub async fn restore_items(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
        reason: &str,
    ) -> Result<usize, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemArchive)?;
        require_ids(ids)?;

        let mut tx = self.item_repo.begin().await?;
        for &id in ids {
            self.lock_item(&mut tx, id).await?;
            self.item_repo.restore(&mut *tx, id).await?;
            self.transaction_repo
                .create(
                    &mut *tx,
                    &item_event(
                        id,
                        TransactionKind::Restore,
                        format!("Restored from archive. Comment: {}", reason.trim()),
                        ctx.user_id,
                    ),
                )
                .await?;
        }
        commit(tx).await?;

        info!(user_id = %ctx.user_id, count = ids.len(), "Items restored");
        self.audit
            .log(
                ctx,
                "item.restore",
                TARGET_ITEM,
                None,
                json!({ "ids": ids, "reason": reason }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(ids.len())
    }

    /// Deletes items with their stock rows and ledger history.
    ///
    /// Items with history must all be archived, and the acting user must
    /// confirm with their password.
    pub async fn delete_items(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
        password: Option<&str>,
    ) -> Result<u64, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemDelete)?;
        require_ids(ids)?;

        let with_history = self.transaction_repo.items_with_history(ids).await?;
        if !with_history.is_empty() {
            let items = self.item_repo.find_many(self.item_repo.pool(), ids).await?;
            let archived = items.iter().filter(|i| i.is_archived).count();
            if archived != ids.len() {
                return Err(AppError::validation(
                    "Active items with stock history cannot be deleted; archive them first",
                ));
            }
            self.confirmation.confirm(ctx.user_id, password).await?;
        }

        let mut tx = self.item_repo.begin().await?;
        let history = self.transaction_repo.delete_for_items(&mut *tx, ids).await?;
        let stocks = self.stock_repo.delete_for_items(&mut *tx, ids).await?;
        let deleted = self.item_repo.delete_many(&mut *tx, ids).await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            deleted,
            history,
            stocks,
            "Items deleted"
        );
        self.audit
            .log(
                ctx,
                "item.delete",
                TARGET_ITEM,
                None,
                json!({ "count": deleted, "ids": ids }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(deleted)
    }

    /// Archives items whose stock has been zero for the configured number
    /// of months.
    pub async fn auto_archive(&self, ctx: &RequestContext) -> Result<usize, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemAutoArchive)?;

        let months = self.config.auto_archive_months;
        let cutoff = Utc::now()
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| AppError::configuration("Auto-archive period is out of range"))?;
        let stale: Vec<Uuid> = self
            .item_repo
            .zero_stock_before(cutoff)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();
        if stale.is_empty() {
            debug!("No stale items to archive");
            return Ok(0);
        }

        let reason = format!("Automatic archive (zero stock for more than {months} months)");
        self.archive(ctx, &stale, &reason).await
    }

    /// Moves items into another category, or out of any category.
    pub async fn bulk_update_category(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
        category_id: Option<Uuid>,
    ) -> Result<u64, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemBulkCategory)?;
        require_ids(ids)?;
        self.find_category(category_id).await?;

        let mut tx = self.item_repo.begin().await?;
        let changed = self
            .item_repo
            .update_category(&mut *tx, ids, category_id)
            .await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, changed, category_id = ?category_id, "Item categories changed");
        self.audit
            .log(
                ctx,
                "item.bulk_category",
                TARGET_ITEM,
                None,
                json!({ "count": ids.len(), "category_id": category_id }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(changed)
    }

    /// Regenerates the SKU and name of every categorized item from the
    /// current dictionaries.
    pub async fn regenerate_all(
        &self,
        ctx: &RequestContext,
    ) -> Result<RegenerateSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemRegenerateSkus)?;

        let dictionary = self.attributes.dictionary().await?;
        let categories = self.category_repo.find_all(self.category_repo.pool()).await?;
        let items = self.item_repo.list_categorized().await?;

        let mut tx = self.item_repo.begin().await?;
        let mut updated = 0;
        for item in &items {
            let Some(category) = item
                .category_id
                .and_then(|id| categories.iter().find(|c| c.id == id))
            else {
                continue;
            };
            let generated = generate(&ItemData::from_item(item), category, &dictionary);
            let sku = generated.sku.or_else(|| item.sku.clone());
            let name = if generated.name.is_empty() {
                item.name.clone()
            } else {
                generated.name
            };
            if sku != item.sku || name != item.name {
                self.item_repo
                    .update_sku_and_name(&mut *tx, item.id, sku.as_deref(), &name)
                    .await?;
                updated += 1;
            }
        }
        commit(tx).await?;

        info!(user_id = %ctx.user_id, updated, total = items.len(), "SKUs regenerated");
        self.audit
            .log(
                ctx,
                "item.regenerate_skus",
                TARGET_ITEM,
                None,
                json!({ "updated": updated, "total": items.len() }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(RegenerateSummary {
            updated,
            total: items.len(),
        })
    }

    async fn archive(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
        reason: &str,
    ) -> Result<usize, AppError> {
        require_ids(ids)?;

        let mut tx = self.item_repo.begin().await?;
        for &id in ids {
            let item = self.lock_item(&mut tx, id).await?;
            if item.quantity > 0 {
                return Err(AppError::validation(format!(
                    "Item «{}» still has stock; write it off before archiving",
                    item.name
                )));
            }
            self.item_repo
                .archive(&mut *tx, id, ctx.user_id, reason)
                .await?;
            self.transaction_repo
                .create(
                    &mut *tx,
                    &item_event(
                        id,
                        TransactionKind::Archive,
                        format!("Archived. Reason: {reason}"),
                        ctx.user_id,
                    ),
                )
                .await?;
        }
        commit(tx).await?;

        info!(user_id = %ctx.user_id, count = ids.len(), "Items archived");
        self.audit
            .log(
                ctx,
                "item.archive",
                TARGET_ITEM,
                None,
                json!({ "ids": ids, "reason": reason }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(ids.len())
    }

    async fn lock_item(&self, tx: &mut PgConnection, id: Uuid) -> Result<InventoryItem, AppError> {
        self.item_repo
            .find_for_update(tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))
    }

    async fn find_category(&self, id: Option<Uuid>) -> Result<Option<Category>, AppError> {
        match id {
            Some(id) => self
                .category_repo
                .find_by_id(id)
                .await?
                .map(Some)
                .ok_or_else(|| AppError::not_found(format!("Category {id} not found"))),
            None => Ok(None),
        }
    }

    async fn generate_for(
        &self,
        data: &ItemData,
        category: Option<&Category>,
    ) -> Result<Option<Generated>, AppError> {
        let Some(category) = category else {
            return Ok(None);
        };
        let dictionary = self.attributes.dictionary().await?;
        Ok(Some(generate(data, category, &dictionary)))
    }

    async fn ensure_unique_sku(&self, sku: Option<&str>, exclude: Option<Uuid>) -> Result<(), AppError> {
        let Some(sku) = sku else {
            return Ok(());
        };
        if let Some(other) = self.item_repo.find_by_sku(sku, exclude).await? {
            return Err(AppError::conflict(format!(
                "SKU '{sku}' is already used by «{}»",
                other.name
            )));
        }
        Ok(())
    }

    fn item_data(&self, req: &ItemRequest, category: Option<&Category>) -> ItemData {
        let unit = if req.item_type == ItemType::Clothing {
            PIECES.to_string()
        } else {
            non_blank(&req.unit)
                .or_else(|| category.and_then(|c| non_blank(&c.default_unit)))
                .unwrap_or_else(|| PIECES.to_string())
        };

        ItemData {
            name: req.name.trim().to_string(),
            sku: non_blank(&req.sku),
            category_id: req.category_id,
            item_type: req.item_type,
            unit,
            low_stock_threshold: req
                .low_stock_threshold
                .unwrap_or(self.config.default_low_stock_threshold),
            critical_stock_threshold: req
                .critical_stock_threshold
                .unwrap_or(self.config.default_critical_stock_threshold),
            description: non_blank(&req.description),
            brand_code: non_blank(&req.brand_code),
            quality_code: non_blank(&req.quality_code),
            material_code: non_blank(&req.material_code),
            color_code: non_blank(&req.color_code),
            size_code: non_blank(&req.size_code),
            attributes: req.attributes.clone(),
            image: non_blank(&req.image),
            image_back: non_blank(&req.image_back),
            image_side: non_blank(&req.image_side),
            image_details: req.image_details.clone(),
            cost_price: req.cost_price,
            selling_price: req.selling_price,
        }
    }
}

fn validate_request(req: &ItemRequest) -> Result<(), AppError> {
    if req.low_stock_threshold.is_some_and(|t| t < 0)
        || req.critical_stock_threshold.is_some_and(|t| t < 0)
    {
        return Err(AppError::validation("Stock thresholds cannot be negative"));
    }
    if req.cost_price.is_some_and(|p| p.is_sign_negative())
        || req.selling_price.is_some_and(|p| p.is_sign_negative())
    {
        return Err(AppError::validation("Prices cannot be negative"));
    }
    if !req.attributes.is_object() {
        return Err(AppError::validation("Attributes must be an object keyed by type"));
    }
    if !req.image_details.is_array() {
        return Err(AppError::validation("Detail images must be a list"));
    }
    Ok(())
}

/// Chooses the final name and SKU.
///
/// Supplied values win. Otherwise the generated ones are used, falling back
/// to the existing item's values on update.
fn resolve_identity(
    req: &ItemRequest,
    generated: Option<&Generated>,
    existing: Option<&InventoryItem>,
) -> Result<(String, Option<String>), AppError> {
    let sku = non_blank(&req.sku)
        .or_else(|| generated.and_then(|g| g.sku.clone()))
        .or_else(|| existing.and_then(|e| e.sku.clone()));

    let name = Some(req.name.trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| generated.map(|g| g.name.clone()).filter(|n| !n.is_empty()))
        .or_else(|| existing.map(|e| e.name.clone()))
        .ok_or_else(|| AppError::validation("Item name is required"))?;

    Ok((name, sku))
}

/// Whether the inputs of SKU/name generation differ from the stored item.
fn identity_inputs_changed(existing: &InventoryItem, data: &ItemData) -> bool {
    existing.category_id != data.category_id
        || FixedSlot::SKU_ORDER
            .iter()
            .any(|&slot| existing.slot_code(slot) != data.slot_code(slot))
        || existing.attributes != data.attributes
}

fn item_event(item_id: Uuid, kind: TransactionKind, reason: String, user_id: Uuid) -> CreateTransaction {
    CreateTransaction {
        item_id: Some(item_id),
        change_amount: 0,
        kind,
        reason: Some(reason),
        storage_location_id: None,
        from_storage_location_id: None,
        cost_price: None,
        created_by: Some(user_id),
    }
}

fn require_ids(ids: &[Uuid]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::validation("No items selected"));
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn existing() -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: "Футболка белая M".to_string(),
            sku: Some("TS-WHT-M".to_string()),
            category_id: Some(Uuid::new_v4()),
            item_type: ItemType::Clothing,
            quantity: 0,
            unit: PIECES.to_string(),
            low_stock_threshold: 10,
            critical_stock_threshold: 0,
            description: None,
            brand_code: None,
            quality_code: None,
            material_code: None,
            color_code: Some("WHT".to_string()),
            size_code: Some("M".to_string()),
            attributes: empty_object(),
            image: None,
            image_back: None,
            image_side: None,
            image_details: empty_array(),
            reserved_quantity: 0,
            cost_price: None,
            selling_price: None,
            is_archived: false,
            archived_at: None,
            archived_by: None,
            archive_reason: None,
            zero_stock_since: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_request_defaults() {
        let req: ItemRequest = serde_json::from_value(json!({ "name": "Кепка" })).unwrap();
        assert_eq!(req.item_type, ItemType::Clothing);
        assert!(req.attributes.is_object());
        assert!(req.image_details.is_array());
        assert_eq!(req.quantity, 0);
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_values() {
        let req = ItemRequest {
            low_stock_threshold: Some(-1),
            attributes: empty_object(),
            image_details: empty_array(),
            ..ItemRequest::default()
        };
        assert!(validate_request(&req).is_err());

        let req = ItemRequest {
            cost_price: Some(Decimal::new(-100, 2)),
            attributes: empty_object(),
            image_details: empty_array(),
            ..ItemRequest::default()
        };
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_supplied_identity_wins() {
        let req = ItemRequest {
            name: " Своя футболка ".to_string(),
            sku: Some("custom-1".to_string()),
            ..ItemRequest::default()
        };
        let generated = Generated {
            sku: Some("TS-BLK-L".to_string()),
            name: "Футболка черная L".to_string(),
        };

        let (name, sku) = resolve_identity(&req, Some(&generated), None).unwrap();
        assert_eq!(name, "Своя футболка");
        assert_eq!(sku.as_deref(), Some("custom-1"));
    }

    #[test]
    fn test_blank_identity_is_generated_or_kept() {
        let req = ItemRequest::default();
        let generated = Generated {
            sku: Some("TS-BLK-L".to_string()),
            name: "Футболка черная L".to_string(),
        };
        let (name, sku) = resolve_identity(&req, Some(&generated), None).unwrap();
        assert_eq!(name, "Футболка черная L");
        assert_eq!(sku.as_deref(), Some("TS-BLK-L"));

        let item = existing();
        let (name, sku) = resolve_identity(&req, None, Some(&item)).unwrap();
        assert_eq!(name, item.name);
        assert_eq!(sku, item.sku);

        let err = resolve_identity(&req, None, None).unwrap_err();
        assert!(err.message.contains("name is required"));
    }

    #[test]
    fn test_identity_inputs_changed() {
        let item = existing();
        let mut data = ItemData::from_item(&item);
        assert!(!identity_inputs_changed(&item, &data));

        data.size_code = Some(" M ".to_string());
        assert!(!identity_inputs_changed(&item, &data));

        data.size_code = Some("L".to_string());
        assert!(identity_inputs_changed(&item, &data));

        let mut data = ItemData::from_item(&item);
        data.attributes = json!({ "print": "DTF" });
        assert!(identity_inputs_changed(&item, &data));
    }
}
