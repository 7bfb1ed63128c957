//! Application builder: wires repositories, services and the router, and
//! runs the HTTP server.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tracing::info;

use warehouse_auth::{JwtDecoder, JwtEncoder, PasswordConfirmation, PasswordHasher, RbacEnforcer};
use warehouse_cache::provider::CacheManager;
use warehouse_core::config::AppConfig;
use warehouse_core::error::AppError;
use warehouse_database::repositories::{
    attribute::AttributeRepository, audit::AuditLogRepository, category::CategoryRepository,
    item::ItemRepository, location::LocationRepository, stock::StockRepository,
    transaction::TransactionRepository, transfer::TransferRepository, user::UserRepository,
};
use warehouse_service::{
    AttributeService, AuditService, AuthService, CategoryService, HistoryService,
    ItemImageService, ItemService, LedgerService, LocationService, StatsService, StockAlerts,
    WarehouseCache,
};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Constructs repositories and services over an existing pool and cache.
pub fn build_state(config: AppConfig, db_pool: PgPool, cache: Arc<CacheManager>) -> AppState {
    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let category_repo = Arc::new(CategoryRepository::new(db_pool.clone()));
    let attribute_repo = Arc::new(AttributeRepository::new(db_pool.clone()));
    let item_repo = Arc::new(ItemRepository::new(db_pool.clone()));
    let stock_repo = Arc::new(StockRepository::new(db_pool.clone()));
    let location_repo = Arc::new(LocationRepository::new(db_pool.clone()));
    let transaction_repo = Arc::new(TransactionRepository::new(db_pool.clone()));
    let transfer_repo = Arc::new(TransferRepository::new());
    let audit_repo = Arc::new(AuditLogRepository::new(db_pool.clone()));

    // ── Auth ─────────────────────────────────────────────────────
    let hasher = PasswordHasher::new(config.auth.password_min_length);
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let rbac = Arc::new(RbacEnforcer::new());
    let confirmation = Arc::new(PasswordConfirmation::new(
        Arc::clone(&user_repo),
        hasher.clone(),
    ));

    // ── Shared service collaborators ─────────────────────────────
    let warehouse_cache = Arc::new(WarehouseCache::new(
        Arc::clone(&cache),
        config.cache.category_ttl(),
    ));
    let audit = Arc::new(AuditService::new(audit_repo));
    let alerts = Arc::new(StockAlerts::new(Arc::clone(&audit)));

    // ── Services ─────────────────────────────────────────────────
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::new(hasher),
        jwt_encoder,
    ));
    let category_service = Arc::new(CategoryService::new(
        Arc::clone(&category_repo),
        Arc::clone(&transaction_repo),
        Arc::clone(&warehouse_cache),
        Arc::clone(&audit),
        Arc::clone(&rbac),
        Arc::clone(&confirmation),
        config.inventory.clone(),
    ));
    let attribute_service = Arc::new(AttributeService::new(
        attribute_repo,
        Arc::clone(&item_repo),
        Arc::clone(&category_repo),
        Arc::clone(&transaction_repo),
        Arc::clone(&warehouse_cache),
        Arc::clone(&audit),
        Arc::clone(&rbac),
        Arc::clone(&confirmation),
    ));
    let ledger_service = Arc::new(LedgerService::new(
        Arc::clone(&item_repo),
        Arc::clone(&stock_repo),
        Arc::clone(&transaction_repo),
        Arc::clone(&transfer_repo),
        Arc::clone(&location_repo),
        Arc::clone(&warehouse_cache),
        Arc::clone(&audit),
        Arc::clone(&alerts),
        Arc::clone(&rbac),
    ));
    let item_image_service = Arc::new(ItemImageService::new(
        Arc::clone(&item_repo),
        Arc::clone(&category_service),
        Arc::clone(&warehouse_cache),
        Arc::clone(&audit),
        Arc::clone(&rbac),
        config.media.clone(),
    ));
    let stats_service = Arc::new(StatsService::new(
        Arc::clone(&item_repo),
        Arc::clone(&transaction_repo),
    ));
    let item_service = Arc::new(ItemService::new(
        Arc::clone(&item_repo),
        Arc::clone(&category_repo),
        Arc::clone(&location_repo),
        Arc::clone(&stock_repo),
        Arc::clone(&transaction_repo),
        Arc::clone(&attribute_service),
        Arc::clone(&ledger_service),
        Arc::clone(&warehouse_cache),
        Arc::clone(&audit),
        alerts,
        Arc::clone(&rbac),
        Arc::clone(&confirmation),
        config.inventory.clone(),
    ));
    let location_service = Arc::new(LocationService::new(
        location_repo,
        stock_repo,
        Arc::clone(&transaction_repo),
        transfer_repo,
        Arc::clone(&warehouse_cache),
        Arc::clone(&audit),
        Arc::clone(&rbac),
        confirmation,
    ));
    let history_service = Arc::new(HistoryService::new(
        transaction_repo,
        audit,
        warehouse_cache,
        rbac,
    ));

    AppState {
        config: Arc::new(config),
        db_pool,
        cache,
        jwt_decoder,
        auth_service,
        category_service,
        attribute_service,
        item_service,
        item_image_service,
        ledger_service,
        location_service,
        history_service,
        stats_service,
    }
}

/// Runs the warehouse server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    tokio::fs::create_dir_all(&config.media.root)
        .await
        .map_err(|e| {
            AppError::storage(format!(
                "Failed to create media root '{}': {e}",
                config.media.root
            ))
        })?;

    let addr = config.server.bind_address();
    let grace = config.server.shutdown_grace();
    let state = build_state(config, db_pool.clone(), cache);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Warehouse server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!(grace_seconds = grace.as_secs(), "Draining database pool");
    if tokio::time::timeout(grace, db_pool.close()).await.is_err() {
        tracing::warn!("Database pool did not close within the grace period");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
