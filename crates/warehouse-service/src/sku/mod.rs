//! SKU and display name generation from attribute codes.

pub mod generator;

pub use generator::{Dictionary, Generated, generate};
