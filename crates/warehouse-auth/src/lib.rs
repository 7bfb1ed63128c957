//! # warehouse-auth
//!
//! Authentication and authorization for the warehouse service.
//!
//! ## Modules
//!
//! - `jwt`: access token creation and validation
//! - `password`: Argon2id hashing and protected-delete confirmation
//! - `rbac`: per-operation role policies

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordConfirmation, PasswordHasher};
pub use rbac::{RbacEnforcer, RbacPolicies, WarehousePermission};
