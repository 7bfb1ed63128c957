//! Access token payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warehouse_entity::user::UserRole;

/// `iss` value of every token this service issues and accepts.
pub const TOKEN_ISSUER: &str = "warehouse";

/// Claims carried by a bearer token.
///
/// Role and display name are snapshotted at login; a role change takes
/// effect on the next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: Uuid,
    /// Always [`TOKEN_ISSUER`].
    pub iss: String,
    pub role: UserRole,
    /// Name recorded as the author of ledger entries.
    pub name: String,
    /// Issued at, Unix seconds.
    pub iat: i64,
    /// Expires at, Unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Expiry as a timestamp; out-of-range values collapse to "now".
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
