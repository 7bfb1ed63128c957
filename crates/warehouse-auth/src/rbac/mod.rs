//! Role-based access control for warehouse operations.

pub mod enforcer;
pub mod policies;

pub use enforcer::RbacEnforcer;
pub use policies::{RbacPolicies, WarehousePermission};
