//! Login and user provisioning.

pub mod service;

pub use service::{AuthService, CreateUserRequest, LoginResult};
