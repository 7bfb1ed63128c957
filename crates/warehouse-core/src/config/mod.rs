//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod inventory;
pub mod logging;
pub mod media;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::{CacheBackend, CacheConfig};
pub use self::database::DatabaseConfig;
pub use self::inventory::InventoryConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::media::MediaConfig;

use crate::error::AppError;

/// Prefix of environment variables that override file configuration,
/// e.g. `WAREHOUSE__DATABASE__URL`.
pub const ENV_PREFIX: &str = "WAREHOUSE";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Local media settings.
    #[serde(default)]
    pub media: MediaConfig,
    /// Inventory business-rule settings.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the `config/` directory.
    ///
    /// Merges `config/default.toml`, an optional `config/{env}.toml` overlay
    /// and environment variables prefixed with `WAREHOUSE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from a TOML string. Missing sections take defaults.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_takes_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            url = "postgres://localhost/warehouse"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.provider, CacheBackend::Memory);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter(), "info");
        assert_eq!(config.cache.category_ttl_seconds, 3600);
        assert_eq!(config.inventory.auto_archive_months, 3);
        assert_eq!(config.inventory.category_path_depth, 5);
        assert_eq!(config.inventory.ancestor_walk_limit, 20);
        assert!((config.inventory.duplicate_name_threshold - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.media.url_prefix, "/api/storage/local");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9000

            [database]
            url = "postgres://db/warehouse"
            max_connections = 4

            [inventory]
            default_low_stock_threshold = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.inventory.default_low_stock_threshold, 25);
        assert_eq!(config.inventory.default_critical_stock_threshold, 0);
    }

    #[test]
    fn test_missing_database_url_is_rejected() {
        let result = AppConfig::from_toml("[server]\nport = 1\n");
        assert!(result.is_err());
    }
}
