//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CRM roles relevant to the warehouse module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system administrator.
    Admin,
    /// Company management.
    Management,
    /// Warehouse staff.
    Warehouse,
    /// Sales department.
    Sales,
    /// Any other employee; read access and basic stock operations.
    Staff,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Management => "management",
            Self::Warehouse => "warehouse",
            Self::Sales => "sales",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = warehouse_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "management" => Ok(Self::Management),
            "warehouse" => Ok(Self::Warehouse),
            "sales" => Ok(Self::Sales),
            "staff" => Ok(Self::Staff),
            _ => Err(warehouse_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, management, warehouse, sales, staff"
            ))),
        }
    }
}
