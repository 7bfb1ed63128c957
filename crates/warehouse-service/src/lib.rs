//! # warehouse-service
//!
//! Business logic for the warehouse. Each service orchestrates repositories,
//! the cache and auth to implement one area: categories, attribute
//! dictionaries, items and their images, the stock ledger, storage locations,
//! history and dashboard statistics.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod attribute;
pub mod audit;
pub mod auth;
pub mod cache;
pub mod category;
pub mod context;
pub mod history;
pub mod item;
pub mod location;
pub mod report;
pub mod sku;
pub mod stock;

pub use attribute::AttributeService;
pub use audit::AuditService;
pub use auth::AuthService;
pub use cache::WarehouseCache;
pub use category::CategoryService;
pub use context::RequestContext;
pub use history::HistoryService;
pub use item::{ItemImageService, ItemService};
pub use location::LocationService;
pub use report::StatsService;
pub use stock::{LedgerService, StockAlerts};
