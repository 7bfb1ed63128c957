//! HTTP server settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Listener, limits and shutdown behavior of the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Requests running longer than this are answered with 408.
    pub request_timeout_seconds: u64,
    /// How long shutdown waits for the database pool to drain.
    pub shutdown_grace_seconds: u64,
    /// Largest accepted JSON body.
    pub body_limit_bytes: usize,
    /// Browser access.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Drain deadline on shutdown.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_seconds: 30,
            shutdown_grace_seconds: 30,
            body_limit_bytes: 2 * 1024 * 1024,
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin access for the web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API; `"*"` allows any.
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime.
    pub max_age_seconds: u64,
}

impl CorsConfig {
    /// Whether any origin is accepted.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            max_age_seconds: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_durations_and_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9001,
            request_timeout_seconds: 5,
            ..ServerConfig::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9001");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_origins_disable_wildcard() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://crm.example.com".to_string()],
            ..CorsConfig::default()
        };
        assert!(!cors.allows_any_origin());
        assert!(CorsConfig::default().allows_any_origin());
    }
}
