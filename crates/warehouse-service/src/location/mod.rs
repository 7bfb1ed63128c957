//! Storage locations.

pub mod seed;
pub mod service;

pub use service::{LocationOrder, LocationRequest, LocationSeedSummary, LocationService};
