//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use warehouse_auth::JwtDecoder;
use warehouse_cache::provider::CacheManager;
use warehouse_core::config::AppConfig;
use warehouse_service::{
    AttributeService, AuthService, CategoryService, HistoryService, ItemImageService, ItemService,
    LedgerService, LocationService, StatsService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Login
    pub auth_service: Arc<AuthService>,
    /// Category tree
    pub category_service: Arc<CategoryService>,
    /// Attribute types and attributes
    pub attribute_service: Arc<AttributeService>,
    /// Inventory items
    pub item_service: Arc<ItemService>,
    /// Item images
    pub item_image_service: Arc<ItemImageService>,
    /// Stock ledger
    pub ledger_service: Arc<LedgerService>,
    /// Storage locations
    pub location_service: Arc<LocationService>,
    /// Ledger history and audit log
    pub history_service: Arc<HistoryService>,
    /// Dashboard statistics
    pub stats_service: Arc<StatsService>,
}
