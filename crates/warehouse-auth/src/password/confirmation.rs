//! Password re-confirmation for destructive operations on protected records.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use warehouse_core::error::AppError;
use warehouse_database::repositories::user::UserRepository;
use warehouse_entity::user::UserRole;

use super::hasher::PasswordHasher;

/// Verifies the acting user's password before protected deletes.
#[derive(Debug, Clone)]
pub struct PasswordConfirmation {
    /// User lookup for the stored hash.
    users: Arc<UserRepository>,
    /// Hash verifier.
    hasher: PasswordHasher,
}

impl PasswordConfirmation {
    /// Creates a new confirmation checker.
    pub fn new(users: Arc<UserRepository>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Requires an administrator and their password, as for deleting system
    /// categories, attribute types and storage locations.
    pub async fn confirm_admin(
        &self,
        user_id: Uuid,
        role: UserRole,
        password: Option<&str>,
    ) -> Result<(), AppError> {
        if !role.is_admin() {
            return Err(AppError::forbidden(
                "Only an administrator can delete protected records",
            ));
        }
        self.confirm(user_id, password).await
    }

    /// Requires the acting user's password.
    pub async fn confirm(&self, user_id: Uuid, password: Option<&str>) -> Result<(), AppError> {
        let password = required_password(password)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user_id, "Password confirmation failed");
            return Err(AppError::unauthorized("Invalid password"));
        }
        Ok(())
    }
}

/// The supplied password, rejecting missing or blank input.
fn required_password(password: Option<&str>) -> Result<&str, AppError> {
    password
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::validation("Password confirmation is required"))
}
