//! # warehouse-entity
//!
//! Domain entity models for the warehouse service. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod attribute;
pub mod audit;
pub mod category;
pub mod item;
pub mod location;
pub mod stock;
pub mod user;
