//! Error type shared by every warehouse crate.
//!
//! Lower layers map their failures into [`AppError`] with `From` impls or
//! `map_err`, and the API layer turns the [`ErrorKind`] into a status code.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong, independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No such record.
    NotFound,
    /// Missing or bad credentials, expired token, wrong confirmation password.
    Authentication,
    /// The caller's role may not do this.
    Authorization,
    /// Bad input or a violated business rule (negative stock, archived item, ...).
    Validation,
    /// Uniqueness clash such as a duplicate SKU or slug.
    Conflict,
    /// Bug or unexpected state.
    Internal,
    /// Query or connection failure.
    Database,
    /// Cache backend failure.
    Cache,
    /// Media file I/O failure.
    Storage,
    /// Invalid or missing settings.
    Configuration,
    /// JSON encode/decode failure.
    Serialization,
}

impl ErrorKind {
    /// Stable upper-case code for logs.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Cache => "CACHE",
            Self::Storage => "STORAGE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
        }
    }

    /// Whether the message may be returned to API callers as is.
    ///
    /// Messages of the remaining kinds can carry SQL, paths or hostnames and
    /// are only logged.
    pub fn is_user_facing(self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::Authentication
                | Self::Authorization
                | Self::Validation
                | Self::Conflict
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A failure with a kind, a message and optionally the underlying cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Classification.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Underlying cause, kept for logging.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Error without an underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Error wrapping `source`.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)*) => {
        impl AppError {
            $(
                $(#[$doc])*
                pub fn $name(message: impl Into<String>) -> Self {
                    Self::new(ErrorKind::$kind, message)
                }
            )*
        }
    };
}

kind_constructors! {
    /// [`ErrorKind::NotFound`].
    not_found => NotFound;
    /// [`ErrorKind::Authentication`].
    unauthorized => Authentication;
    /// [`ErrorKind::Authorization`].
    forbidden => Authorization;
    /// [`ErrorKind::Validation`].
    validation => Validation;
    /// [`ErrorKind::Conflict`].
    conflict => Conflict;
    /// [`ErrorKind::Internal`].
    internal => Internal;
    /// [`ErrorKind::Database`].
    database => Database;
    /// [`ErrorKind::Storage`].
    storage => Storage;
    /// [`ErrorKind::Configuration`].
    configuration => Configuration;
}

impl Clone for AppError {
    /// The source is not cloneable and is dropped.
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, format!("Invalid JSON: {err}"), err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::validation("quantity must be positive");
        assert_eq!(err.to_string(), "VALIDATION: quantity must be positive");
        assert_eq!(AppError::not_found("x").kind, ErrorKind::NotFound);
        assert_eq!(AppError::forbidden("x").kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_user_facing_kinds() {
        assert!(ErrorKind::Conflict.is_user_facing());
        assert!(ErrorKind::Authorization.is_user_facing());
        assert!(!ErrorKind::Database.is_user_facing());
        assert!(!ErrorKind::Internal.is_user_facing());
    }

    #[test]
    fn test_kind_serializes_as_code() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
        assert_eq!(ErrorKind::Serialization.to_string(), "SERIALIZATION");
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Storage, "read failed", io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.kind, ErrorKind::Storage);
    }
}
