//! Storage location management.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use warehouse_auth::{PasswordConfirmation, RbacEnforcer, WarehousePermission};
use warehouse_cache::keys;
use warehouse_core::error::AppError;
use warehouse_database::connection::commit;
use warehouse_database::repositories::location::LocationRepository;
use warehouse_database::repositories::stock::StockRepository;
use warehouse_database::repositories::transaction::TransactionRepository;
use warehouse_database::repositories::transfer::TransferRepository;
use warehouse_entity::location::{
    LocationData, LocationKind, LocationStockItem, LocationWithItems, StorageLocation,
};

use super::seed;
use crate::audit::AuditService;
use crate::audit::service::TARGET_LOCATION;
use crate::cache::WarehouseCache;
use crate::context::RequestContext;

fn default_true() -> bool {
    true
}

/// Request to create or update a storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Responsible user.
    #[serde(default)]
    pub responsible_user_id: Option<Uuid>,
    /// Location kind.
    #[serde(default, rename = "type")]
    pub kind: LocationKind,
    /// Makes this the only default location.
    #[serde(default)]
    pub is_default: bool,
    /// Active flag.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Manual position.
    #[serde(default)]
    pub sort_order: i32,
}

/// New position of one location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationOrder {
    /// Location ID.
    pub id: Uuid,
    /// New sort order.
    pub sort_order: i32,
}

/// Outcome of seeding storage locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSeedSummary {
    /// Locations inserted.
    pub created: usize,
    /// Locations already present by name.
    pub existing: usize,
}

/// Manages storage locations.
#[derive(Debug, Clone)]
pub struct LocationService {
    /// Location repository.
    location_repo: Arc<LocationRepository>,
    /// Stock row repository.
    stock_repo: Arc<StockRepository>,
    /// Ledger repository.
    transaction_repo: Arc<TransactionRepository>,
    /// Transfer record repository.
    transfer_repo: Arc<TransferRepository>,
    /// Warehouse cache.
    cache: Arc<WarehouseCache>,
    /// Audit writer.
    audit: Arc<AuditService>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
    /// Password re-confirmation.
    confirmation: Arc<PasswordConfirmation>,
}

impl LocationService {
    /// Creates a new location service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        location_repo: Arc<LocationRepository>,
        stock_repo: Arc<StockRepository>,
        transaction_repo: Arc<TransactionRepository>,
        transfer_repo: Arc<TransferRepository>,
        cache: Arc<WarehouseCache>,
        audit: Arc<AuditService>,
        rbac: Arc<RbacEnforcer>,
        confirmation: Arc<PasswordConfirmation>,
    ) -> Self {
        Self {
            location_repo,
            stock_repo,
            transaction_repo,
            transfer_repo,
            cache,
            audit,
            rbac,
            confirmation,
        }
    }

    /// Lists locations in display order with the items stocked at each.
    pub async fn list_locations(&self) -> Result<Vec<LocationWithItems>, AppError> {
        self.cache
            .get_or_load(&keys::locations_all(), || self.load_locations())
            .await
    }

    /// Creates a location.
    pub async fn create_location(
        &self,
        ctx: &RequestContext,
        req: LocationRequest,
    ) -> Result<StorageLocation, AppError> {
        let data = location_data(&req, false)?;

        let mut tx = self.location_repo.begin().await?;
        let location = self.location_repo.create(&mut *tx, &data).await?;
        if location.is_default {
            self.location_repo
                .clear_default(&mut *tx, Some(location.id))
                .await?;
        }
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            location_id = %location.id,
            name = %location.name,
            "Storage location created"
        );
        self.audit
            .log(
                ctx,
                "location.create",
                TARGET_LOCATION,
                Some(location.id),
                json!({ "name": location.name, "is_default": location.is_default }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(location)
    }

    /// Updates a location.
    pub async fn update_location(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: LocationRequest,
    ) -> Result<StorageLocation, AppError> {
        let mut tx = self.location_repo.begin().await?;
        let existing = self
            .location_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Storage location {id} not found")))?;
        let data = location_data(&req, existing.is_system)?;

        if data.is_default {
            self.location_repo.clear_default(&mut *tx, Some(id)).await?;
        }
        let location = self
            .location_repo
            .update(&mut *tx, id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Storage location {id} not found")))?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, location_id = %id, "Storage location updated");
        self.audit
            .log(
                ctx,
                "location.update",
                TARGET_LOCATION,
                Some(id),
                json!({
                    "old_name": existing.name,
                    "name": location.name,
                    "is_default": location.is_default,
                }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(location)
    }

    /// Deletes an empty location, detaching its ledger history.
    pub async fn delete_location(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        password: Option<&str>,
    ) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::LocationDelete)?;

        let existing = self
            .location_repo
            .find_by_id(self.location_repo.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Storage location {id} not found")))?;
        if existing.is_system {
            self.confirmation
                .confirm_admin(ctx.user_id, ctx.role, password)
                .await?;
        }

        let mut tx = self.location_repo.begin().await?;
        let held = self
            .stock_repo
            .positive_total_for_location(&mut *tx, id)
            .await?;
        if held > 0 {
            return Err(AppError::validation(format!(
                "Location «{}» still holds {held} unit(s); move the stock first",
                existing.name
            )));
        }
        self.stock_repo.delete_empty_for_location(&mut *tx, id).await?;
        let ledger_rows = self.transaction_repo.detach_location(&mut *tx, id).await?;
        let transfers = self.transfer_repo.detach_location(&mut *tx, id).await?;
        self.location_repo.delete(&mut *tx, id).await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            location_id = %id,
            ledger_rows,
            transfers,
            "Storage location deleted"
        );
        self.audit
            .log(
                ctx,
                "location.delete",
                TARGET_LOCATION,
                Some(id),
                json!({ "name": existing.name, "is_system": existing.is_system }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(())
    }

    /// Applies new manual positions.
    pub async fn reorder_locations(
        &self,
        ctx: &RequestContext,
        order: Vec<LocationOrder>,
    ) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::LocationReorder)?;

        let mut tx = self.location_repo.begin().await?;
        for entry in &order {
            self.location_repo
                .update_sort_order(&mut *tx, entry.id, entry.sort_order)
                .await?;
        }
        commit(tx).await?;

        info!(user_id = %ctx.user_id, count = order.len(), "Storage locations reordered");
        self.cache.invalidate().await;

        Ok(())
    }

    /// Inserts the standard locations that do not exist yet, matched by name.
    pub async fn seed_locations(&self, ctx: &RequestContext) -> Result<LocationSeedSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::SeedSystemData)?;

        let mut tx = self.location_repo.begin().await?;
        let mut summary = LocationSeedSummary::default();
        for def in &seed::LOCATIONS {
            if self
                .location_repo
                .find_by_name(&mut *tx, def.name)
                .await?
                .is_some()
            {
                summary.existing += 1;
                continue;
            }
            let data = LocationData {
                name: def.name.to_string(),
                address: def.address.to_string(),
                kind: def.kind,
                is_active: true,
                ..LocationData::default()
            };
            self.location_repo.create(&mut *tx, &data).await?;
            summary.created += 1;
        }
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            created = summary.created,
            existing = summary.existing,
            "Storage locations seeded"
        );
        if summary.created > 0 {
            self.audit
                .log(
                    ctx,
                    "location.seed",
                    TARGET_LOCATION,
                    None,
                    json!({ "created": summary.created }),
                )
                .await;
            self.cache.invalidate().await;
        }

        Ok(summary)
    }

    async fn load_locations(&self) -> Result<Vec<LocationWithItems>, AppError> {
        let locations = self.location_repo.list().await?;
        let stock = self.stock_repo.positive_items_by_location().await?;

        let mut names: HashMap<Uuid, Option<String>> = HashMap::new();
        for user_id in locations.iter().filter_map(|l| l.responsible_user_id) {
            if !names.contains_key(&user_id) {
                let name = self.location_repo.user_display_name(user_id).await?;
                names.insert(user_id, name);
            }
        }

        Ok(group_by_location(locations, stock, &names))
    }
}

/// Attaches stocked items and responsible-user names to each location,
/// keeping the location order.
fn group_by_location(
    locations: Vec<StorageLocation>,
    stock: Vec<LocationStockItem>,
    names: &HashMap<Uuid, Option<String>>,
) -> Vec<LocationWithItems> {
    let mut by_location: HashMap<Uuid, Vec<LocationStockItem>> = HashMap::new();
    for row in stock {
        by_location.entry(row.storage_location_id).or_default().push(row);
    }

    locations
        .into_iter()
        .map(|location| LocationWithItems {
            responsible_user_name: location
                .responsible_user_id
                .and_then(|id| names.get(&id).cloned().flatten()),
            items: by_location.remove(&location.id).unwrap_or_default(),
            location,
        })
        .collect()
}

fn location_data(req: &LocationRequest, is_system: bool) -> Result<LocationData, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Location name is required"));
    }
    let address = req.address.trim();
    if address.is_empty() {
        return Err(AppError::validation("Location address is required"));
    }

    Ok(LocationData {
        name: name.to_string(),
        address: address.to_string(),
        description: req
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        responsible_user_id: req.responsible_user_id,
        kind: req.kind,
        is_system,
        is_default: req.is_default,
        is_active: req.is_active,
        sort_order: req.sort_order,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn location(name: &str, responsible: Option<Uuid>) -> StorageLocation {
        StorageLocation {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: "ул. Складская, 1".to_string(),
            description: None,
            responsible_user_id: responsible,
            kind: LocationKind::Warehouse,
            is_system: false,
            is_default: false,
            is_active: true,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stock(location_id: Uuid, name: &str, quantity: i32) -> LocationStockItem {
        LocationStockItem {
            storage_location_id: location_id,
            item_id: Uuid::new_v4(),
            name: name.to_string(),
            sku: None,
            quantity,
            unit: "шт.".to_string(),
        }
    }

    #[test]
    fn test_group_by_location_keeps_order() {
        let keeper = Uuid::new_v4();
        let main = location("Основной", Some(keeper));
        let office = location("Офис", None);
        let rows = vec![
            stock(main.id, "Футболка", 5),
            stock(office.id, "Кепка", 2),
            stock(main.id, "Худи", 1),
        ];
        let names = HashMap::from([(keeper, Some("Иван".to_string()))]);

        let grouped = group_by_location(vec![main.clone(), office.clone()], rows, &names);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].location.id, main.id);
        assert_eq!(grouped[0].items.len(), 2);
        assert_eq!(grouped[0].responsible_user_name.as_deref(), Some("Иван"));
        assert_eq!(grouped[1].items.len(), 1);
        assert_eq!(grouped[1].responsible_user_name, None);
    }

    #[test]
    fn test_location_data_requires_name_and_address() {
        let mut req: LocationRequest =
            serde_json::from_value(json!({ "name": " Склад ", "address": "Москва" })).unwrap();
        assert!(req.is_active);
        assert_eq!(req.kind, LocationKind::Warehouse);

        let data = location_data(&req, true).unwrap();
        assert_eq!(data.name, "Склад");
        assert!(data.is_system);

        req.address = "  ".to_string();
        assert!(location_data(&req, false).is_err());
    }

    #[test]
    fn test_seed_locations_are_distinct() {
        let names: std::collections::HashSet<_> = seed::LOCATIONS.iter().map(|l| l.name).collect();
        assert_eq!(names.len(), seed::LOCATIONS.len());
        assert!(seed::LOCATIONS.iter().all(|l| !l.address.is_empty()));
        assert_eq!(seed::LOCATIONS[0].kind, LocationKind::Production);
    }
}
