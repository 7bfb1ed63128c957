//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use warehouse_entity::user::UserRole;

/// A warehouse operation guarded by role.
///
/// Operations open to every authenticated user (reads, stock adjustments,
/// transfers, moves, creating attributes and locations) have no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarehousePermission {
    // Categories
    /// Create categories.
    CategoryCreate,
    /// Edit categories.
    CategoryUpdate,
    /// Delete categories.
    CategoryDelete,
    /// Change category order.
    CategoryReorder,
    /// Recompute slugs and paths of every category.
    CategoryRebuildPaths,

    // Dictionaries
    /// Create attribute types.
    AttributeTypeCreate,
    /// Edit attribute types.
    AttributeTypeUpdate,
    /// Delete attribute types.
    AttributeTypeDelete,
    /// Edit attributes.
    AttributeUpdate,
    /// Delete attributes.
    AttributeDelete,

    // Items
    /// Create and edit items.
    ItemWrite,
    /// Archive and restore items.
    ItemArchive,
    /// Delete items.
    ItemDelete,
    /// Move many items to another category.
    ItemBulkCategory,
    /// Regenerate every SKU and name.
    ItemRegenerateSkus,
    /// Archive long-empty items.
    ItemAutoArchive,

    // Stock
    /// Move many items to one location.
    StockBulkMove,
    /// Recompute cached quantities.
    StockSync,

    // Locations
    /// Change location order.
    LocationReorder,
    /// Delete locations.
    LocationDelete,

    // History
    /// Delete ledger entries.
    HistoryDelete,

    // System
    /// Insert system categories and attributes.
    SeedSystemData,
}

/// Defines the mapping from each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Role → set of permissions.
    policies: HashMap<UserRole, HashSet<WarehousePermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use WarehousePermission as P;

        // Sales: catalogue work and archiving
        let sales: HashSet<_> = [
            P::CategoryCreate,
            P::CategoryDelete,
            P::CategoryReorder,
            P::ItemWrite,
            P::ItemArchive,
        ]
        .into_iter()
        .collect();

        // Warehouse: catalogue work and stock organisation, no archiving
        let warehouse: HashSet<_> = [
            P::CategoryCreate,
            P::CategoryUpdate,
            P::CategoryDelete,
            P::CategoryReorder,
            P::ItemWrite,
            P::ItemBulkCategory,
            P::StockBulkMove,
            P::LocationReorder,
            P::LocationDelete,
        ]
        .into_iter()
        .collect();

        // Management: sales + warehouse + dictionaries and maintenance
        let mut management: HashSet<_> = sales.union(&warehouse).copied().collect();
        management.extend([
            P::AttributeTypeCreate,
            P::AttributeTypeUpdate,
            P::AttributeTypeDelete,
            P::AttributeUpdate,
            P::AttributeDelete,
            P::ItemDelete,
            P::ItemRegenerateSkus,
            P::ItemAutoArchive,
            P::StockSync,
        ]);

        // Admin: everything
        let mut admin = management.clone();
        admin.extend([P::CategoryRebuildPaths, P::HistoryDelete, P::SeedSystemData]);

        let policies = HashMap::from([
            (UserRole::Admin, admin),
            (UserRole::Management, management),
            (UserRole::Warehouse, warehouse),
            (UserRole::Sales, sales),
            (UserRole::Staff, HashSet::new()),
        ]);

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: UserRole) -> HashSet<WarehousePermission> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: UserRole, permission: WarehousePermission) -> bool {
        self.policies
            .get(&role)
            .map(|perms| perms.contains(&permission))
            .unwrap_or(false)
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WarehousePermission as P;

    fn allowed(permission: WarehousePermission) -> Vec<UserRole> {
        let policies = RbacPolicies::new();
        [
            UserRole::Admin,
            UserRole::Management,
            UserRole::Warehouse,
            UserRole::Sales,
            UserRole::Staff,
        ]
        .into_iter()
        .filter(|r| policies.has_permission(*r, permission))
        .collect()
    }

    #[test]
    fn test_category_roles() {
        use UserRole::*;
        assert_eq!(allowed(P::CategoryCreate), vec![Admin, Management, Warehouse, Sales]);
        assert_eq!(allowed(P::CategoryUpdate), vec![Admin, Management, Warehouse]);
        assert_eq!(allowed(P::CategoryRebuildPaths), vec![Admin]);
    }

    #[test]
    fn test_item_roles() {
        use UserRole::*;
        assert_eq!(allowed(P::ItemArchive), vec![Admin, Management, Sales]);
        assert_eq!(allowed(P::ItemDelete), vec![Admin, Management]);
        assert_eq!(allowed(P::ItemBulkCategory), vec![Admin, Management, Warehouse]);
        assert_eq!(allowed(P::ItemWrite), vec![Admin, Management, Warehouse, Sales]);
    }

    #[test]
    fn test_maintenance_roles() {
        use UserRole::*;
        assert_eq!(allowed(P::StockSync), vec![Admin, Management]);
        assert_eq!(allowed(P::HistoryDelete), vec![Admin]);
        assert_eq!(allowed(P::LocationDelete), vec![Admin, Management, Warehouse]);
    }

    #[test]
    fn test_staff_has_no_guarded_permissions() {
        assert!(RbacPolicies::new().permissions_for_role(UserRole::Staff).is_empty());
    }
}
