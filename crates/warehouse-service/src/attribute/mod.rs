//! Attribute type and attribute dictionaries.

pub mod seed;
pub mod service;

pub use service::{
    AttributeRequest, AttributeSeedSummary, AttributeService, AttributeTypeRequest,
    AttributeUpdateRequest,
};
