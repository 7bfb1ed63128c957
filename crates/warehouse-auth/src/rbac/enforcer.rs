//! RBAC enforcement logic: checks whether a role may perform an operation.

use warehouse_core::error::AppError;
use warehouse_entity::user::UserRole;

use super::policies::{RbacPolicies, WarehousePermission};

/// Enforces role-based access control for warehouse operations.
#[derive(Debug, Clone)]
pub struct RbacEnforcer {
    /// The policy configuration.
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Returns `Ok(())` if allowed, or a `Forbidden` error if denied.
    pub fn require_permission(
        &self,
        role: UserRole,
        permission: WarehousePermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }

    /// Checks whether the role has the required permission (returns bool).
    pub fn has_permission(&self, role: UserRole, permission: WarehousePermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}

impl Default for RbacEnforcer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use warehouse_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_denied_is_forbidden() {
        let enforcer = RbacEnforcer::new();
        let err = enforcer
            .require_permission(UserRole::Staff, WarehousePermission::ItemWrite)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(err.message.contains("staff"));
    }

    #[test]
    fn test_admin_allowed() {
        let enforcer = RbacEnforcer::new();
        assert!(
            enforcer
                .require_permission(UserRole::Admin, WarehousePermission::SeedSystemData)
                .is_ok()
        );
    }
}
