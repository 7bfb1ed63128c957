//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warehouse_entity::user::{User, UserRole};
use warehouse_service::auth::LoginResult;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Number of rows touched by a bulk operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountResponse {
    /// Affected rows.
    pub count: u64,
}

impl CountResponse {
    /// Wraps a count.
    pub fn new(count: impl TryInto<u64>) -> Self {
        Self {
            count: count.try_into().unwrap_or(0),
        }
    }
}

/// Derived paths of one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPaths {
    /// Path such as `"Одежда > Футболка"`.
    pub display_path: String,
    /// Image directory such as `"Одежда/Футболка"`.
    pub storage_path: String,
    /// Whether the category is the requested ancestor or lies beneath it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descends_from: Option<bool>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Access token expiration.
    pub expires_at: DateTime<Utc>,
    /// User info.
    pub user: UserResponse,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            access_token: result.token.access_token,
            expires_at: result.token.expires_at,
            user: result.user.into(),
        }
    }
}

/// User summary for responses; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answers, `degraded` otherwise.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Database reachability.
    pub database: bool,
    /// Cache reachability.
    pub cache: bool,
}
