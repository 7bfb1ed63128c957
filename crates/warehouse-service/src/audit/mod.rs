//! Audit logging.

pub mod service;

pub use service::AuditService;
