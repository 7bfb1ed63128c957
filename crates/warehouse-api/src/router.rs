//! Route definitions for the warehouse HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.


use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let server = &config.server;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(health_routes())
        .merge(category_routes())
        .merge(attribute_routes())
        .merge(item_routes())
        .merge(image_routes(config.media.max_image_bytes))
        .merge(stock_routes())
        .merge(location_routes())
        .merge(history_routes())
        .merge(stats_routes())
        .merge(media_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(middleware::compression::build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&server.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Login and current user
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Category tree CRUD, ordering, path rebuild and seeding
fn category_routes() -> Router<AppState> {
    use handlers::category::*;

    Router::new()
        .route(
            "/warehouse/categories",
            get(list_categories).post(create_category),
        )
        .route("/warehouse/categories/order", put(reorder_categories))
        .route("/warehouse/categories/rebuild-paths", post(rebuild_paths))
        .route("/warehouse/categories/seed", post(seed_categories))
        .route(
            "/warehouse/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/warehouse/categories/{id}/paths", get(category_paths))
}

/// Attribute types and attributes
fn attribute_routes() -> Router<AppState> {
    use handlers::attribute::*;

    Router::new()
        .route(
            "/warehouse/attribute-types",
            get(list_types).post(create_type),
        )
        .route(
            "/warehouse/attribute-types/{id}",
            put(update_type).delete(delete_type),
        )
        .route(
            "/warehouse/attributes",
            get(list_attributes).post(create_attribute),
        )
        .route("/warehouse/attributes/seed", post(seed_attributes))
        .route(
            "/warehouse/attributes/{id}",
            put(update_attribute).delete(delete_attribute),
        )
}

/// Item CRUD, duplicate check and bulk item operations
fn item_routes() -> Router<AppState> {
    use handlers::item::*;

    Router::new()
        .route("/warehouse/items", get(list_items).post(create_item))
        .route("/warehouse/items/orphaned-count", get(orphaned_count))
        .route("/warehouse/items/check-duplicate", post(check_duplicate))
        .route("/warehouse/items/archive", post(archive_items))
        .route("/warehouse/items/restore", post(restore_items))
        .route("/warehouse/items/delete", post(delete_items))
        .route("/warehouse/items/auto-archive", post(auto_archive))
        .route("/warehouse/items/regenerate-skus", post(regenerate_skus))
        .route("/warehouse/items/bulk-category", post(bulk_category))
        .route("/warehouse/items/by-sku/{sku}", get(get_item_by_sku))
        .route("/warehouse/items/{id}", get(get_item).put(update_item))
}

/// Item image upload and removal, allowing a few full-size images per request
fn image_routes(max_image_bytes: usize) -> Router<AppState> {
    use handlers::image::*;

    Router::new()
        .route("/warehouse/items/{id}/images", post(upload_images))
        .route("/warehouse/items/{id}/images/{slot}", delete(delete_image))
        .layer(DefaultBodyLimit::max(max_image_bytes.saturating_mul(8)))
}

/// Stock ledger operations
fn stock_routes() -> Router<AppState> {
    use handlers::stock::*;

    Router::new()
        .route("/warehouse/items/{id}/adjust", post(adjust_stock))
        .route("/warehouse/items/{id}/transfer", post(transfer_stock))
        .route("/warehouse/items/{id}/move", post(move_item))
        .route("/warehouse/items/{id}/stocks", get(item_stocks))
        .route("/warehouse/items/{id}/history", get(item_history))
        .route("/warehouse/stock/bulk-move", post(bulk_move))
        .route("/warehouse/stock/sync", post(sync_quantities))
}

/// Storage locations
fn location_routes() -> Router<AppState> {
    use handlers::location::*;

    Router::new()
        .route(
            "/warehouse/locations",
            get(list_locations).post(create_location),
        )
        .route("/warehouse/locations/order", put(reorder_locations))
        .route("/warehouse/locations/seed", post(seed_locations))
        .route(
            "/warehouse/locations/{id}",
            put(update_location).delete(delete_location),
        )
}

/// Ledger history and audit log
fn history_routes() -> Router<AppState> {
    use handlers::history::*;

    Router::new()
        .route(
            "/warehouse/history",
            get(list_history).delete(clear_history),
        )
        .route("/warehouse/history/delete", post(delete_history))
        .route("/warehouse/audit-log", get(audit_log))
}

/// Dashboard statistics
fn stats_routes() -> Router<AppState> {
    Router::new().route("/warehouse/stats", get(handlers::stats::warehouse_stats))
}

/// Local item images
fn media_routes() -> Router<AppState> {
    Router::new().route(
        "/storage/local/{*path}",
        get(handlers::media::serve_local),
    )
}
