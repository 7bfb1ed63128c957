//! Log output settings.

use serde::{Deserialize, Serialize};

/// Line format of the log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for collectors.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset,
    /// e.g. `"warehouse_service=debug,info"`.
    pub level: Option<String>,
    /// Output format.
    pub format: LogFormat,
}

impl LoggingConfig {
    /// The filter directive, `info` when unset.
    pub fn filter(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }
}
