//! Inventory category entity and hierarchy helpers.

pub mod model;
pub mod tree;

pub use model::{Category, CategoryData, CategoryGender, CategoryWithStats};
pub use tree::{CategoryForest, CategoryNode};
