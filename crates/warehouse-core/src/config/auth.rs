//! Token and password settings.

use serde::{Deserialize, Serialize};

/// Placeholder that must be overridden outside development.
pub const INSECURE_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// JWT signing and password policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    pub jwt_access_ttl_minutes: u64,
    /// Shortest password accepted when provisioning users.
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Whether the signing secret is still the shipped placeholder.
    pub fn uses_insecure_secret(&self) -> bool {
        self.jwt_secret == INSECURE_JWT_SECRET || self.jwt_secret.len() < 16
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: INSECURE_JWT_SECRET.to_string(),
            jwt_access_ttl_minutes: 12 * 60,
            password_min_length: 8,
        }
    }
}
