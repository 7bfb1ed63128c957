//! Category CRUD, ordering and path maintenance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use warehouse_auth::{PasswordConfirmation, RbacEnforcer, WarehousePermission};
use warehouse_cache::keys;
use warehouse_core::config::InventoryConfig;
use warehouse_core::error::AppError;
use warehouse_database::connection::commit;
use warehouse_database::repositories::category::CategoryRepository;
use warehouse_database::repositories::transaction::TransactionRepository;
use warehouse_entity::category::{
    Category, CategoryData, CategoryForest, CategoryGender, CategoryWithStats,
};
use warehouse_entity::stock::CreateTransaction;

use super::seed::{self, SystemCategory};
use super::slug::SlugAllocator;
use crate::audit::AuditService;
use crate::audit::service::TARGET_CATEGORY;
use crate::cache::WarehouseCache;
use crate::context::RequestContext;

fn default_true() -> bool {
    true
}

/// Request to create or fully update a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Color token.
    #[serde(default)]
    pub color: Option<String>,
    /// SKU prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Parent category.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Manual position.
    #[serde(default)]
    pub sort_order: i32,
    /// Active flag.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Grammatical gender.
    #[serde(default)]
    pub gender: CategoryGender,
    /// Singular form.
    #[serde(default)]
    pub singular_name: Option<String>,
    /// Plural form.
    #[serde(default)]
    pub plural_name: Option<String>,
    /// Default unit for new items.
    #[serde(default)]
    pub default_unit: Option<String>,
    /// Prefix visibility in SKUs.
    #[serde(default = "default_true")]
    pub show_in_sku: bool,
    /// Name visibility in item names.
    #[serde(default = "default_true")]
    pub show_in_name: bool,
}

/// New position of one category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryOrder {
    /// Category ID.
    pub id: Uuid,
    /// New sort order.
    pub sort_order: i32,
}

/// Outcome of rebuilding slugs and paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RebuildSummary {
    /// Categories whose slug or path changed.
    pub updated: usize,
    /// Categories inspected.
    pub total: usize,
}

/// Outcome of seeding system categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedSummary {
    /// Rows inserted.
    pub created: usize,
    /// Existing rows corrected.
    pub updated: usize,
}

/// Manages the category tree.
#[derive(Debug, Clone)]
pub struct CategoryService {
    /// Category repository.
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
    /// Path depth and walk limits.
    config: InventoryConfig,
}

impl CategoryService {
    /// Creates a new category service.
    pub fn new(
        category_repo: Arc<CategoryRepository>,
        transaction_repo: Arc<TransactionRepository>,
        cache: Arc<WarehouseCache>,
        audit: Arc<AuditService>,
        rbac: Arc<RbacEnforcer>,
        confirmation: Arc<PasswordConfirmation>,
        config: InventoryConfig,
    ) -> Self {
        Self {
            category_repo,
            transaction_repo,
            cache,
            audit,
            rbac,
            confirmation,
            config,
        }
    }

    /// Lists every category with item counts.
    pub async fn list_categories(&self) -> Result<Vec<CategoryWithStats>, AppError> {
        self.cache
            .get_or_load(&keys::categories_all(), || self.category_repo.list_with_stats())
            .await
    }

    /// Gets a category by ID.
    pub async fn get_category(&self, id: Uuid) -> Result<Category, AppError> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))
    }

    /// Display path such as `"Одежда > Футболка"`.
    pub async fn display_path(&self, id: Uuid) -> Result<String, AppError> {
        let forest = self.forest().await?;
        if forest.get(id).is_none() {
            return Err(AppError::not_found(format!("Category {id} not found")));
        }
        Ok(forest.display_path(id, self.config.category_path_depth))
    }

    /// Filesystem-safe directory path for item images.
    pub async fn storage_path(&self, id: Option<Uuid>) -> Result<String, AppError> {
        let forest = self.forest().await?;
        Ok(forest.storage_path(id, self.config.category_path_depth))
    }

    /// Whether `node` is `possible_ancestor` or lies beneath it.
    pub async fn is_descendant(&self, node: Uuid, possible_ancestor: Uuid) -> Result<bool, AppError> {
        let forest = self.forest().await?;
        Ok(forest.is_descendant(node, possible_ancestor, self.config.ancestor_walk_limit))
    }

    /// Creates a category.
    pub async fn create_category(
        &self,
        ctx: &RequestContext,
        req: CategoryRequest,
    ) -> Result<Category, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::CategoryCreate)?;
        let name = validate_name(&req.name)?;

        let mut tx = self.category_repo.begin().await?;
        let all = self.category_repo.find_all(&mut *tx).await?;
        let forest = CategoryForest::from_categories(&all);

        if let Some(parent_id) = req.parent_id {
            if forest.get(parent_id).is_none() {
                return Err(AppError::not_found(format!("Parent category {parent_id} not found")));
            }
        }

        let mut slugs = SlugAllocator::with_used(all.iter().filter_map(|c| c.slug.clone()));
        let full_path = forest.path_for_child(req.parent_id, &name, self.config.category_path_depth);
        let data = category_data(&req, name, Some(slugs.allocate(&req.name)), full_path, false);

        let category = self.category_repo.create(&mut *tx, &data).await?;
        self.transaction_repo
            .create(
                &mut *tx,
                &CreateTransaction::attribute_change(
                    format!("Category created: {}", category.name),
                    ctx.user_id,
                ),
            )
            .await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            category_id = %category.id,
            name = %category.name,
            "Category created"
        );
        self.audit
            .log(
                ctx,
                "category.create",
                TARGET_CATEGORY,
                Some(category.id),
                json!({ "name": category.name, "parent_id": category.parent_id }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(category)
    }

    /// Updates a category and rewrites stale descendant paths.
    pub async fn update_category(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: CategoryRequest,
    ) -> Result<Category, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::CategoryUpdate)?;
        let name = validate_name(&req.name)?;

        if req.parent_id == Some(id) {
            return Err(AppError::validation("A category cannot be its own parent"));
        }

        let mut tx = self.category_repo.begin().await?;
        let all = self.category_repo.find_all(&mut *tx).await?;
        let forest = CategoryForest::from_categories(&all);

        let existing = all
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;

        if let Some(parent_id) = req.parent_id {
            if forest.get(parent_id).is_none() {
                return Err(AppError::not_found(format!("Parent category {parent_id} not found")));
            }
            if forest.is_descendant(parent_id, id, self.config.ancestor_walk_limit) {
                return Err(AppError::validation(
                    "A category cannot be moved into its own subcategory",
                ));
            }
        }

        let slug = match &existing.slug {
            Some(slug) if existing.name == name => slug.clone(),
            _ => SlugAllocator::with_used(
                all.iter()
                    .filter(|c| c.id != id)
                    .filter_map(|c| c.slug.clone()),
            )
            .allocate(&name),
        };
        let full_path = forest.path_for_child(req.parent_id, &name, self.config.category_path_depth);
        let data = category_data(&req, name, Some(slug), full_path, existing.is_system);

        let category = self
            .category_repo
            .update(&mut *tx, id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;

        let reloaded = self.category_repo.find_all(&mut *tx).await?;
        let rewrites = CategoryForest::from_categories(&reloaded).descendant_path_rewrites(id);
        for (child_id, path) in &rewrites {
            self.category_repo
                .update_full_path(&mut *tx, *child_id, path)
                .await?;
        }

        self.transaction_repo
            .create(
                &mut *tx,
                &CreateTransaction::attribute_change(
                    format!("Category updated: {}", category.name),
                    ctx.user_id,
                ),
            )
            .await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            category_id = %id,
            descendants_rewritten = rewrites.len(),
            "Category updated"
        );
        self.audit
            .log(
                ctx,
                "category.update",
                TARGET_CATEGORY,
                Some(id),
                json!({ "name": category.name, "parent_id": category.parent_id }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(category)
    }

    /// Deletes a category without subcategories, unlinking its items.
    pub async fn delete_category(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        password: Option<&str>,
    ) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::CategoryDelete)?;

        let category = self.get_category(id).await?;
        if category.is_system {
            self.confirmation
                .confirm_admin(ctx.user_id, ctx.role, password)
                .await?;
        }

        if self.category_repo.count_children(id).await? > 0 {
            return Err(AppError::validation(
                "A category with subcategories cannot be deleted; move or delete them first",
            ));
        }

        let mut tx = self.category_repo.begin().await?;
        let unlinked = self.category_repo.unlink_items(&mut *tx, id).await?;
        if !self.category_repo.delete(&mut *tx, id).await? {
            return Err(AppError::not_found(format!("Category {id} not found")));
        }
        self.transaction_repo
            .create(
                &mut *tx,
                &CreateTransaction::attribute_change(
                    format!("Category deleted: {}", category.name),
                    ctx.user_id,
                ),
            )
            .await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, category_id = %id, unlinked, "Category deleted");
        self.audit
            .log(
                ctx,
                "category.delete",
                TARGET_CATEGORY,
                Some(id),
                json!({ "name": category.name, "is_system": category.is_system, "unlinked_items": unlinked }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(())
    }

    /// Applies new positions to categories.
    pub async fn reorder_categories(
        &self,
        ctx: &RequestContext,
        order: Vec<CategoryOrder>,
    ) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::CategoryReorder)?;
        if order.is_empty() {
            return Ok(());
        }

        let mut tx = self.category_repo.begin().await?;
        for entry in &order {
            self.category_repo
                .update_sort_order(&mut *tx, entry.id, entry.sort_order)
                .await?;
        }
        self.transaction_repo
            .create(
                &mut *tx,
                &CreateTransaction::attribute_change(
                    format!("Category order updated ({} categories)", order.len()),
                    ctx.user_id,
                ),
            )
            .await?;
        commit(tx).await?;

        info!(user_id = %ctx.user_id, count = order.len(), "Categories reordered");
        self.cache.invalidate().await;
        Ok(())
    }

    /// Recomputes unique slugs and full paths for every category.
    ///
    /// Older categories keep the plain slug when two names collide.
    pub async fn rebuild_paths(&self, ctx: &RequestContext) -> Result<RebuildSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::CategoryRebuildPaths)?;

        let mut tx = self.category_repo.begin().await?;
        let mut all = self.category_repo.find_all(&mut *tx).await?;
        all.sort_by_key(|c| c.created_at);
        let forest = CategoryForest::from_categories(&all);

        let mut slugs = SlugAllocator::default();
        let mut summary = RebuildSummary {
            total: all.len(),
            ..RebuildSummary::default()
        };
        for category in &all {
            let slug = slugs.allocate(&category.name);
            let path = forest.display_path(category.id, self.config.category_path_depth);
            if category.slug.as_deref() != Some(slug.as_str())
                || category.full_path.as_deref() != Some(path.as_str())
            {
                self.category_repo
                    .update_slug_and_path(&mut *tx, category.id, &slug, &path)
                    .await?;
                summary.updated += 1;
            }
        }
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            updated = summary.updated,
            total = summary.total,
            "Category paths rebuilt"
        );
        self.audit
            .log(
                ctx,
                "category.rebuild_paths",
                TARGET_CATEGORY,
                None,
                json!({ "updated": summary.updated, "total": summary.total }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(summary)
    }

    /// Inserts or corrects the built-in category tree.
    pub async fn seed_system_categories(&self, ctx: &RequestContext) -> Result<SeedSummary, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::SeedSystemData)?;

        let mut tx = self.category_repo.begin().await?;
        let mut all = self.category_repo.find_all(&mut *tx).await?;
        let mut slugs = SlugAllocator::with_used(all.iter().filter_map(|c| c.slug.clone()));
        let mut summary = SeedSummary::default();

        let mut clothing_id = None;
        for def in &seed::ROOTS {
            let id = match all.iter().find(|c| c.name == def.name) {
                Some(existing) => {
                    if !existing.is_system {
                        self.category_repo.mark_system(&mut *tx, existing.id).await?;
                        summary.updated += 1;
                    }
                    existing.id
                }
                None => {
                    let data = system_data(def, None, def.name.to_string(), slugs.allocate(def.name));
                    let created = self.category_repo.create(&mut *tx, &data).await?;
                    summary.created += 1;
                    let id = created.id;
                    all.push(created);
                    id
                }
            };
            if def.name == seed::CLOTHING {
                clothing_id = Some(id);
            }
        }

        let clothing_id = clothing_id
            .ok_or_else(|| AppError::internal("Clothing root missing after seeding"))?;
        let clothing_path = all
            .iter()
            .find(|c| c.id == clothing_id)
            .and_then(|c| c.full_path.clone())
            .unwrap_or_else(|| seed::CLOTHING.to_string());

        for def in &seed::GARMENTS {
            let full_path = format!("{clothing_path} > {}", def.name);
            let existing = all
                .iter()
                .find(|c| c.name == def.name || Some(c.name.as_str()) == def.plural_name);

            match existing {
                None => {
                    let data = system_data(def, Some(clothing_id), full_path, slugs.allocate(def.name));
                    self.category_repo.create(&mut *tx, &data).await?;
                    summary.created += 1;
                }
                Some(found) => {
                    let needs_update = found.singular_name.as_deref() != def.singular_name
                        || found.plural_name.as_deref() != def.plural_name
                        || found.gender != def.gender
                        || found.parent_id != Some(clothing_id)
                        || !found.is_system;
                    if needs_update {
                        let mut data = CategoryData {
                            singular_name: def.singular_name.map(str::to_string),
                            plural_name: def.plural_name.map(str::to_string),
                            gender: def.gender,
                            parent_id: Some(clothing_id),
                            full_path: join_under(&clothing_path, &found.name),
                            ..existing_data(found)
                        };
                        if data.prefix.is_none() {
                            data.prefix = def.prefix.map(str::to_string);
                        }
                        self.category_repo.update(&mut *tx, found.id, &data).await?;
                        if !found.is_system {
                            self.category_repo.mark_system(&mut *tx, found.id).await?;
                        }
                        summary.updated += 1;
                    }
                }
            }
        }

        self.transaction_repo
            .create(
                &mut *tx,
                &CreateTransaction::attribute_change(
                    format!(
                        "System categories seeded: {} created, {} updated",
                        summary.created, summary.updated
                    ),
                    ctx.user_id,
                ),
            )
            .await?;
        commit(tx).await?;

        info!(
            user_id = %ctx.user_id,
            created = summary.created,
            updated = summary.updated,
            "System categories seeded"
        );
        self.audit
            .log(
                ctx,
                "category.seed",
                TARGET_CATEGORY,
                None,
                json!({ "created": summary.created, "updated": summary.updated }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(summary)
    }

    async fn forest(&self) -> Result<CategoryForest, AppError> {
        let all = self.category_repo.find_all(self.category_repo.pool()).await?;
        Ok(CategoryForest::from_categories(&all))
    }
}

fn validate_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    if name.chars().count() > 255 {
        return Err(AppError::validation("Category name is too long"));
    }
    Ok(name.to_string())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn category_data(
    req: &CategoryRequest,
    name: String,
    slug: Option<String>,
    full_path: String,
    is_system: bool,
) -> CategoryData {
    CategoryData {
        name,
        description: non_blank(&req.description),
        icon: non_blank(&req.icon).or_else(|| Some("package".to_string())),
        color: non_blank(&req.color).or_else(|| Some("primary".to_string())),
        prefix: non_blank(&req.prefix).map(|p| p.to_uppercase()),
        parent_id: req.parent_id,
        sort_order: req.sort_order,
        is_active: req.is_active,
        is_system,
        gender: req.gender,
        singular_name: non_blank(&req.singular_name),
        plural_name: non_blank(&req.plural_name),
        default_unit: non_blank(&req.default_unit),
        slug,
        full_path,
        show_in_sku: req.show_in_sku,
        show_in_name: req.show_in_name,
    }
}

fn existing_data(category: &Category) -> CategoryData {
    CategoryData {
        name: category.name.clone(),
        description: category.description.clone(),
        icon: category.icon.clone(),
        color: category.color.clone(),
        prefix: category.prefix.clone(),
        parent_id: category.parent_id,
        sort_order: category.sort_order,
        is_active: category.is_active,
        is_system: category.is_system,
        gender: category.gender,
        singular_name: category.singular_name.clone(),
        plural_name: category.plural_name.clone(),
        default_unit: category.default_unit.clone(),
        slug: category.slug.clone(),
        full_path: category.full_path.clone().unwrap_or_else(|| category.name.clone()),
        show_in_sku: category.show_in_sku,
        show_in_name: category.show_in_name,
    }
}

fn system_data(def: &SystemCategory, parent_id: Option<Uuid>, full_path: String, slug: String) -> CategoryData {
    CategoryData {
        name: def.name.to_string(),
        description: def.description.map(str::to_string),
        icon: Some(def.icon.to_string()),
        color: Some(def.color.to_string()),
        prefix: def.prefix.map(str::to_string),
        parent_id,
        sort_order: 0,
        is_active: true,
        is_system: true,
        gender: def.gender,
        singular_name: def.singular_name.map(str::to_string),
        plural_name: def.plural_name.map(str::to_string),
        default_unit: None,
        slug: Some(slug),
        full_path,
        show_in_sku: true,
        show_in_name: true,
    }
}

fn join_under(parent_path: &str, name: &str) -> String {
    format!("{parent_path} > {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> CategoryRequest {
        serde_json::from_value(json!({ "name": name })).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req = request("Футболка");
        assert!(req.is_active);
        assert!(req.show_in_sku);
        assert!(req.show_in_name);
        assert_eq!(req.gender, CategoryGender::Masculine);
        assert_eq!(req.sort_order, 0);
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Худи ").unwrap(), "Худи");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_category_data_normalizes_blanks() {
        let mut req = request("Кепка");
        req.prefix = Some(" cp ".to_string());
        req.description = Some("  ".to_string());
        let data = category_data(&req, "Кепка".to_string(), Some("kepka".to_string()), "Кепка".to_string(), false);

        assert_eq!(data.prefix.as_deref(), Some("CP"));
        assert_eq!(data.description, None);
        assert_eq!(data.icon.as_deref(), Some("package"));
        assert!(!data.is_system);
    }
}
