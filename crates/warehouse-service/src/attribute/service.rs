//! Attribute type and attribute management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use warehouse_auth::{PasswordConfirmation, RbacEnforcer, WarehousePermission};
use warehouse_cache::keys;
use warehouse_core::error::AppError;
use warehouse_database::connection::commit;
use warehouse_database::repositories::attribute::AttributeRepository;
use warehouse_database::repositories::category::CategoryRepository;
use warehouse_database::repositories::item::ItemRepository;
use warehouse_database::repositories::transaction::TransactionRepository;
use warehouse_entity::attribute::{
    Attribute, AttributeData, AttributeMeta, AttributeType, AttributeTypeData, FixedSlot,
};
use warehouse_entity::item::ItemData;
use warehouse_entity::stock::CreateTransaction;

use super::seed::{SYSTEM_ATTRIBUTES, system_type_name};
use crate::audit::AuditService;
use crate::audit::service::TARGET_ATTRIBUTE;
use crate::cache::WarehouseCache;
use crate::context::RequestContext;
use crate::sku::{Dictionary, generate};

fn default_true() -> bool {
    true
}

/// Request to create or update an attribute type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeTypeRequest {
    /// Display name.
    pub name: String,
    /// Machine name; normalized to `[a-z0-9_]`. Ignored on update.
    #[serde(default)]
    pub slug: String,
    /// Category restriction.
    #[serde(default)]
    pub category_id: Option<Uuid>,
    /// Protected flag.
    #[serde(default)]
    pub is_system: bool,
    /// Position among custom types.
    #[serde(default)]
    pub sort_order: i32,
    /// Default SKU visibility.
    #[serde(default = "default_true")]
    pub show_in_sku: bool,
    /// Default name visibility.
    #[serde(default = "default_true")]
    pub show_in_name: bool,
}

/// Request to create an attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRequest {
    /// Owning type slug.
    pub type_slug: String,
    /// Display name.
    pub name: String,
    /// Code written into items and SKUs.
    pub code: String,
    /// Display metadata.
    #[serde(default)]
    pub meta: AttributeMeta,
}

/// Request to update an attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeUpdateRequest {
    /// Display name.
    pub name: String,
    /// Code written into items and SKUs.
    pub code: String,
    /// Display metadata.
    #[serde(default)]
    pub meta: AttributeMeta,
}

/// Outcome of seeding system attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeSeedSummary {
    /// Types inserted.
    pub types_created: usize,
    /// Values inserted.
    pub attributes_created: usize,
}

/// Manages attribute dictionaries.
#[derive(Debug, Clone)]
pub struct AttributeService {
    /// Attribute repository.
    attribute_repo: Arc<AttributeRepository>,
    /// Item repository, for SKU regeneration.
    item_repo: Arc<ItemRepository>,
    /// Category repository, for SKU regeneration.
    category_repo: Arc<CategoryRepository>,
    /// Ledger repository.
    transaction_repo: Arc<TransactionRepository>,
    /// Warehouse cache.
    cache: Arc<WarehouseCache>,
    /// Audit writer.
    audit: Arc<AuditService>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
    /// Password re-confirmation.
    confirmation: Arc<PasswordConfirmation>,
}

impl AttributeService {
    /// Creates a new attribute service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        attribute_repo: Arc<AttributeRepository>,
        item_repo: Arc<ItemRepository>,
        category_repo: Arc<CategoryRepository>,
        transaction_repo: Arc<TransactionRepository>,
        cache: Arc<WarehouseCache>,
        audit: Arc<AuditService>,
        rbac: Arc<RbacEnforcer>,
        confirmation: Arc<PasswordConfirmation>,
    ) -> Self {
        Self {
            attribute_repo,
            item_repo,
            category_repo,
            transaction_repo,
            cache,
            audit,
            rbac,
            confirmation,
        }
    }

    /// Lists attribute types in generation order.
    pub async fn list_types(&self) -> Result<Vec<AttributeType>, AppError> {
        self.cache
            .get_or_load(&keys::attribute_types_all(), || self.attribute_repo.list_types())
            .await
    }

    /// Lists attributes, optionally of one type.
    pub async fn list_attributes(&self, type_slug: Option<&str>) -> Result<Vec<Attribute>, AppError> {
        match type_slug {
            Some(slug) => self.attribute_repo.list_attributes(Some(slug)).await,
            None => {
                self.cache
                    .get_or_load(&keys::attributes_all(), || {
                        self.attribute_repo.list_attributes(None)
                    })
                    .await
            }
        }
    }

    /// Snapshot of the whole dictionary for SKU generation.
    pub async fn dictionary(&self) -> Result<Dictionary, AppError> {
        let types = self.list_types().await?;
        let attributes = self.list_attributes(None).await?;
        Ok(Dictionary::new(types, attributes))
    }

    /// Creates an attribute type.
    pub async fn create_type(
        &self,
        ctx: &RequestContext,
        req: AttributeTypeRequest,
    ) -> Result<AttributeType, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::AttributeTypeCreate)?;

        let name = required(&req.name, "Type name")?;
        let slug = AttributeType::normalize_slug(&req.slug);
        if slug.trim_matches('_').is_empty() {
            return Err(AppError::validation(
                "Type slug must contain latin letters or digits",
            ));
        }
        if self.attribute_repo.find_type_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Attribute type '{slug}' already exists"
            )));
        }

        let data = AttributeTypeData {
            slug,
            name,
            is_system: req.is_system,
            sort_order: req.sort_order,
            category_id: req.category_id,
            show_in_sku: req.show_in_sku,
            show_in_name: req.show_in_name,
        };

        let mut tx = self.attribute_repo.begin().await?;
        let created = self.attribute_repo.create_type(&mut *tx, &data).await?;
        self.record_change(
            &mut tx,
            ctx,
            format!("Attribute type created: {} ({})", created.name, created.slug),
        )
        .await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, slug = %created.slug, "Attribute type created");
        self.audit
            .log(
                ctx,
                "attribute_type.create",
                TARGET_ATTRIBUTE,
                Some(created.id),
                json!({ "slug": created.slug, "name": created.name }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(created)
    }

    /// Updates an attribute type. The slug never changes because items
    /// reference it.
    pub async fn update_type(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: AttributeTypeRequest,
    ) -> Result<AttributeType, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::AttributeTypeUpdate)?;

        let existing = self.find_type(id).await?;
        let data = AttributeTypeData {
            slug: existing.slug.clone(),
            name: required(&req.name, "Type name")?,
            is_system: existing.is_system,
            sort_order: req.sort_order,
            category_id: req.category_id,
            show_in_sku: req.show_in_sku,
            show_in_name: req.show_in_name,
        };

        let mut tx = self.attribute_repo.begin().await?;
        let updated = self
            .attribute_repo
            .update_type(&mut *tx, id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attribute type {id} not found")))?;
        self.record_change(&mut tx, ctx, format!("Attribute type updated: {}", updated.name))
            .await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, slug = %updated.slug, "Attribute type updated");
        self.audit
            .log(
                ctx,
                "attribute_type.update",
                TARGET_ATTRIBUTE,
                Some(id),
                json!({
                    "slug": updated.slug,
                    "show_in_sku": updated.show_in_sku,
                    "show_in_name": updated.show_in_name,
                }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(updated)
    }

    /// Deletes an attribute type that has no attributes.
    pub async fn delete_type(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        password: Option<&str>,
    ) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::AttributeTypeDelete)?;

        let existing = self.find_type(id).await?;
        if existing.is_system {
            self.confirmation
                .confirm_admin(ctx.user_id, ctx.role, password)
                .await?;
        }
        if self
            .attribute_repo
            .count_attributes_of_type(&existing.slug)
            .await?
            > 0
        {
            return Err(AppError::validation(
                "This type still has attributes; delete them first",
            ));
        }

        let mut tx = self.attribute_repo.begin().await?;
        self.attribute_repo.delete_type(&mut *tx, id).await?;
        self.record_change(&mut tx, ctx, format!("Attribute type deleted: {}", existing.name))
            .await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, slug = %existing.slug, "Attribute type deleted");
        self.audit
            .log(
                ctx,
                "attribute_type.delete",
                TARGET_ATTRIBUTE,
                Some(id),
                json!({ "slug": existing.slug, "is_system": existing.is_system }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(())
    }

    /// Creates an attribute value.
    pub async fn create_attribute(
        &self,
        ctx: &RequestContext,
        req: AttributeRequest,
    ) -> Result<Attribute, AppError> {
        let attr_type = self
            .attribute_repo
            .find_type_by_slug(req.type_slug.trim())
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Attribute type '{}' not found", req.type_slug))
            })?;

        let data = AttributeData {
            type_slug: attr_type.slug.clone(),
            name: required(&req.name, "Attribute name")?,
            code: required(&req.code, "Attribute code")?,
            meta: req.meta,
        };

        let mut tx = self.attribute_repo.begin().await?;
        let created = self.attribute_repo.create_attribute(&mut *tx, &data).await?;
        self.record_change(
            &mut tx,
            ctx,
            format!(
                "Attribute added: {} ({}) to {}",
                created.name, created.code, attr_type.name
            ),
        )
        .await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            type_slug = %created.type_slug,
            code = %created.code,
            "Attribute created"
        );
        self.cache.invalidate().await;

        Ok(created)
    }

    /// Updates an attribute. When its code or effective SKU visibility
    /// changes, items using it get the new code and a regenerated SKU.
    pub async fn update_attribute(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: AttributeUpdateRequest,
    ) -> Result<Attribute, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::AttributeUpdate)?;

        let old = self
            .attribute_repo
            .find_attribute(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attribute {id} not found")))?;
        let data = AttributeData {
            type_slug: old.type_slug.clone(),
            name: required(&req.name, "Attribute name")?,
            code: required(&req.code, "Attribute code")?,
            meta: req.meta,
        };

        let types = self.attribute_repo.list_types().await?;
        let mut attributes = self.attribute_repo.list_attributes(None).await?;
        let type_default = types
            .iter()
            .find(|t| t.slug == old.type_slug)
            .map(|t| t.show_in_sku);

        let mut tx = self.attribute_repo.begin().await?;
        let updated = self
            .attribute_repo
            .update_attribute(&mut *tx, id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attribute {id} not found")))?;

        let code_changed = old.code != updated.code;
        let visibility_changed =
            old.visible_in_sku(type_default) != updated.visible_in_sku(type_default);

        let mut regenerated = 0;
        if code_changed || visibility_changed {
            let item_ids = self
                .attribute_repo
                .items_using(&mut *tx, &old.type_slug, &old.code)
                .await?;
            if code_changed {
                self.attribute_repo
                    .replace_code_on_items(&mut *tx, &old.type_slug, &old.code, &updated.code)
                    .await?;
            }

            attributes.retain(|a| a.id != id);
            attributes.push(updated.clone());
            let dictionary = Dictionary::new(types, attributes);
            regenerated = self
                .regenerate_item_skus(&mut tx, &item_ids, &dictionary)
                .await?;
        }

        self.record_change(
            &mut tx,
            ctx,
            format!("Attribute updated: {} ({})", updated.name, updated.code),
        )
        .await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            attribute_id = %id,
            code_changed,
            visibility_changed,
            regenerated,
            "Attribute updated"
        );
        self.audit
            .log(
                ctx,
                "attribute.update",
                TARGET_ATTRIBUTE,
                Some(id),
                json!({
                    "type_slug": updated.type_slug,
                    "old_code": old.code,
                    "new_code": updated.code,
                    "regenerated_items": regenerated,
                }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(updated)
    }

    /// Deletes an attribute no item uses.
    pub async fn delete_attribute(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::AttributeDelete)?;

        let existing = self
            .attribute_repo
            .find_attribute(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attribute {id} not found")))?;

        let usage = self
            .attribute_repo
            .count_items_using(&existing.type_slug, &existing.code)
            .await?;
        if usage > 0 {
            return Err(AppError::validation(format!(
                "Attribute is used by {usage} item(s) and cannot be deleted"
            )));
        }

        let mut tx = self.attribute_repo.begin().await?;
        self.attribute_repo.delete_attribute(&mut *tx, id).await?;
        self.record_change(
            &mut tx,
            ctx,
            format!("Attribute deleted: {} ({})", existing.name, existing.code),
        )
        .await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, attribute_id = %id, "Attribute deleted");
        self.audit
            .log(
                ctx,
                "attribute.delete",
                TARGET_ATTRIBUTE,
                Some(id),
                json!({ "type_slug": existing.type_slug, "code": existing.code }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(())
    }

    /// Inserts the fixed-slot types and their built-in values when missing.
    pub async fn seed_system_attributes(
        &self,
        ctx: &RequestContext,
    ) -> Result<AttributeSeedSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::SeedSystemData)?;

        let existing: Vec<String> = self
            .attribute_repo
            .list_types()
            .await?
            .into_iter()
            .map(|t| t.slug)
            .collect();

        let mut summary = AttributeSeedSummary::default();
        let mut tx = self.attribute_repo.begin().await?;

        for slot in FixedSlot::SKU_ORDER {
            if existing.iter().any(|s| s == slot.type_slug()) {
                continue;
            }
            let data = AttributeTypeData {
                slug: slot.type_slug().to_string(),
                name: system_type_name(slot).to_string(),
                is_system: true,
                sort_order: 0,
                category_id: None,
                show_in_sku: true,
                show_in_name: slot != FixedSlot::Material,
            };
            self.attribute_repo.create_type(&mut *tx, &data).await?;
            summary.types_created += 1;
        }

        for attr in &SYSTEM_ATTRIBUTES {
            let data = AttributeData {
                type_slug: attr.slot.type_slug().to_string(),
                name: attr.name.to_string(),
                code: attr.code.to_string(),
                meta: attr.meta(),
            };
            if self
                .attribute_repo
                .insert_attribute_if_missing(&mut *tx, &data)
                .await?
            {
                summary.attributes_created += 1;
            }
        }

        self.record_change(
            &mut tx,
            ctx,
            format!(
                "System attributes seeded: {} types, {} values",
                summary.types_created, summary.attributes_created
            ),
        )
        .await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            types_created = summary.types_created,
            attributes_created = summary.attributes_created,
            "System attributes seeded"
        );
        self.cache.invalidate().await;

        Ok(summary)
    }

    /// Regenerates the SKUs of `item_ids`, keeping their names.
    async fn regenerate_item_skus(
        &self,
        tx: &mut PgConnection,
        item_ids: &[Uuid],
        dictionary: &Dictionary,
    ) -> Result<usize, AppError> {
        if item_ids.is_empty() {
            return Ok(0);
        }
        let categories = self.category_repo.find_all(&mut *tx).await?;
        let items = self.item_repo.find_many(&mut *tx, item_ids).await?;

        let mut changed = 0;
        for item in &items {
            let Some(category) = item
                .category_id
                .and_then(|cid| categories.iter().find(|c| c.id == cid))
            else {
                continue;
            };
            let generated = generate(&ItemData::from_item(item), category, dictionary);
            if generated.sku.is_some() && generated.sku != item.sku {
                debug!(item_id = %item.id, sku = ?generated.sku, "Regenerating SKU");
                self.item_repo
                    .update_sku_and_name(&mut *tx, item.id, generated.sku.as_deref(), &item.name)
                    .await?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn record_change(
        &self,
        tx: &mut PgConnection,
        ctx: &RequestContext,
        reason: String,
    ) -> Result<(), AppError> {
        self.transaction_repo
            .create(tx, &CreateTransaction::attribute_change(reason, ctx.user_id))
            .await?;
        Ok(())
    }

    async fn find_type(&self, id: Uuid) -> Result<AttributeType, AppError> {
        self.attribute_repo
            .find_type(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Attribute type {id} not found")))
    }
}

/// Trimmed non-empty text, or a validation error naming `field`.
pub(crate) fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  BLU ", "Code").unwrap(), "BLU");
        let err = required(" ", "Code").unwrap_err();
        assert!(err.message.contains("Code is required"));
    }

    #[test]
    fn test_type_request_defaults() {
        let req: AttributeTypeRequest =
            serde_json::from_value(json!({ "name": "Принт", "slug": "print" })).unwrap();
        assert!(req.show_in_sku);
        assert!(req.show_in_name);
        assert!(!req.is_system);
        assert_eq!(req.category_id, None);
    }

    #[test]
    fn test_attribute_request_meta_defaults() {
        let req: AttributeRequest = serde_json::from_value(json!({
            "type_slug": "color",
            "name": "Синий",
            "code": "BLU",
        }))
        .unwrap();
        assert_eq!(req.meta, AttributeMeta::default());
    }
}
