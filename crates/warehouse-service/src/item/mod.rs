//! Inventory items, their images and duplicate detection.

pub mod duplicate;
pub mod images;
pub mod service;

pub use duplicate::{DuplicateMatch, find_duplicate};
pub use images::{ImageUpload, ItemImageService};
pub use service::{DuplicateCheck, ItemRequest, ItemService, RegenerateSummary};
