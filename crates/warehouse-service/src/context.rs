//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warehouse_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API extractor and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
    /// The user's display name.
    pub name: String,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, name: String, ip_address: Option<String>) -> Self {
        Self {
            user_id,
            role,
            name,
            ip_address,
            request_time: Utc::now(),
        }
    }

    /// Context for maintenance commands run outside HTTP.
    pub fn system(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Admin, "system".to_string(), None)
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
