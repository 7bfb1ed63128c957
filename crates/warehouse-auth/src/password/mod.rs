//! Password hashing and re-confirmation.

pub mod confirmation;
pub mod hasher;

pub use confirmation::PasswordConfirmation;
pub use hasher::PasswordHasher;
