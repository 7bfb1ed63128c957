//! Audit log entity.

pub mod model;

pub use model::{AuditFilter, AuditLogEntry, CreateAuditLogEntry};
