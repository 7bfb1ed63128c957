//! Attribute dictionary entities.

pub mod model;
pub mod slot;

pub use model::{Attribute, AttributeData, AttributeMeta, AttributeType, AttributeTypeData};
pub use slot::FixedSlot;
