//! User management commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use warehouse_auth::{JwtEncoder, PasswordHasher};
use warehouse_core::config::AppConfig;
use warehouse_core::error::AppError;
use warehouse_database::repositories::user::UserRepository;
use warehouse_entity::user::UserRole;
use warehouse_service::AuthService;
use warehouse_service::auth::CreateUserRequest;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<UserRole>,
    },
    /// Create a user; prompts for the password when not given
    Create {
        /// Login name
        username: String,
        /// Role: admin, management, warehouse, sales or staff
        #[arg(short, long, default_value = "staff")]
        role: UserRole,
        /// Name shown in history
        #[arg(short, long)]
        display_name: Option<String>,
        /// Password
        #[arg(long)]
        password: Option<String>,
    },
    /// Reset a user's password
    SetPassword {
        /// Login name
        username: String,
        /// New password
        #[arg(long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Display name
    display_name: String,
    /// Role
    role: String,
    /// Active flag
    active: bool,
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let user_repo = Arc::new(UserRepository::new(pool.clone()));

    match &args.command {
        UserCommand::List { role } => {
            let rows: Vec<UserRow> = user_repo
                .find_all(*role)
                .await?
                .into_iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    username: u.username,
                    display_name: u.display_name,
                    role: u.role.to_string(),
                    active: u.is_active,
                })
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::Create {
            username,
            role,
            display_name,
            password,
        } => {
            let password = password_or_prompt(password.as_deref(), username)?;
            let user = auth_service(config, user_repo)
                .create_user(CreateUserRequest {
                    username: username.clone(),
                    display_name: display_name.clone(),
                    password,
                    role: *role,
                })
                .await?;

            output::print_success(&format!(
                "User '{}' created with role {}",
                user.username, user.role
            ));
        }
        UserCommand::SetPassword { username, password } => {
            let password = password_or_prompt(password.as_deref(), username)?;
            let user = auth_service(config, user_repo)
                .set_password(username, &password)
                .await?;
            output::print_success(&format!("Password of '{}' updated", user.username));
        }
    }

    pool.close().await;
    Ok(())
}

fn auth_service(config: &AppConfig, user_repo: Arc<UserRepository>) -> AuthService {
    AuthService::new(
        user_repo,
        Arc::new(PasswordHasher::new(config.auth.password_min_length)),
        Arc::new(JwtEncoder::new(&config.auth)),
    )
}

fn password_or_prompt(given: Option<&str>, username: &str) -> Result<String, AppError> {
    match given {
        Some(p) => Ok(p.to_string()),
        None => dialoguer::Password::new()
            .with_prompt(format!("Password for '{username}'"))
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Prompt failed: {e}"))),
    }
}
