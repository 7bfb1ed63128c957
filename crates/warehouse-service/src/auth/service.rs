//! Password login and user creation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use warehouse_auth::jwt::AccessToken;
use warehouse_auth::{JwtEncoder, PasswordHasher};
use warehouse_core::error::AppError;
use warehouse_database::repositories::user::UserRepository;
use warehouse_entity::user::{CreateUser, User, UserRole};

/// Message returned for every failed login so usernames cannot be guessed.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// A successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// Issued access token.
    pub token: AccessToken,
    /// The authenticated user.
    pub user: User,
}

/// Request to create a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    pub username: String,
    /// Name shown in history; defaults to the username.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Plaintext password.
    pub password: String,
    /// Assigned role.
    pub role: UserRole,
}

/// Verifies credentials and provisions users.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Argon2 hasher.
    hasher: Arc<PasswordHasher>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            encoder,
        }
    }

    /// Checks a username/password pair and issues an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AppError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Username and password are required"));
        }

        let Some(user) = self.user_repo.find_by_username(username).await? else {
            warn!(username = %username, "Login for unknown user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };
        if !user.is_active {
            warn!(user_id = %user.id, "Login for inactive user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.encoder.generate_access_token(&user)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResult { token, user })
    }

    /// Creates a user with a hashed password.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User, AppError> {
        let username = req.username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict(format!("User '{username}' already exists")));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let display_name = req
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(username)
            .to_string();

        let user = self
            .user_repo
            .create(&CreateUser {
                username: username.to_string(),
                display_name,
                password_hash,
                role: req.role,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// Replaces the password of `username`. Tokens already issued stay valid
    /// until they expire.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{}' not found", username.trim())))?;

        let password_hash = self.hasher.hash_password(password)?;
        self.user_repo.update_password(user.id, &password_hash).await?;

        warn!(user_id = %user.id, "Password reset");
        Ok(user)
    }
}
