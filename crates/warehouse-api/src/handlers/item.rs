//! Inventory item handlers.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;
use validator::Validate;

use warehouse_core::types::pagination::PageResponse;
use warehouse_entity::item::{InventoryItem, ItemSummary};
use warehouse_service::item::{DuplicateCheck, ItemRequest, RegenerateSummary};

use crate::dto::request::{
    BulkCategoryRequest, CheckDuplicateRequest, DeleteItemsRequest, ItemReasonRequest, ItemsQuery,
};
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AppPath, AppQuery, AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/warehouse/items
pub async fn list_items(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(params): AppQuery<PaginationParams>,
    AppQuery(query): AppQuery<ItemsQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<ItemSummary>>>> {
    let filter = query.into_filter();
    let page = params.into_page_request();
    let items = state.item_service.list_items(&filter, &page).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/warehouse/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state.item_service.get_item(id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// GET /api/warehouse/items/by-sku/{sku}
pub async fn get_item_by_sku(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(sku): AppPath<String>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state.item_service.find_by_sku(&sku).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// GET /api/warehouse/items/orphaned-count
pub async fn orphaned_count(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.item_service.orphaned_count().await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}

/// POST /api/warehouse/items/check-duplicate
pub async fn check_duplicate(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(req): AppJson<CheckDuplicateRequest>,
) -> ApiResult<Json<ApiResponse<DuplicateCheck>>> {
    req.validate()?;
    let check = state
        .item_service
        .check_duplicate(&req.name, req.sku.as_deref(), req.exclude_id)
        .await?;
    Ok(Json(ApiResponse::ok(check)))
}

/// POST /api/warehouse/items
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<ItemRequest>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state.item_service.create_item(&auth, req).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// PUT /api/warehouse/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<ItemRequest>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state.item_service.update_item(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/warehouse/items/archive
pub async fn archive_items(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<ItemReasonRequest>,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    req.validate()?;
    let count = state
        .item_service
        .archive_items(&auth, &req.ids, &req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}

/// POST /api/warehouse/items/restore
pub async fn restore_items(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<ItemReasonRequest>,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    req.validate()?;
    let count = state
        .item_service
        .restore_items(&auth, &req.ids, &req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}

/// POST /api/warehouse/items/delete
pub async fn delete_items(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<DeleteItemsRequest>,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    req.validate()?;
    let count = state
        .item_service
        .delete_items(&auth, &req.ids, req.password.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}

/// POST /api/warehouse/items/auto-archive
pub async fn auto_archive(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.item_service.auto_archive(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}

/// POST /api/warehouse/items/regenerate-skus
pub async fn regenerate_skus(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<RegenerateSummary>>> {
    let summary = state.item_service.regenerate_all(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/warehouse/items/bulk-category
pub async fn bulk_category(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<BulkCategoryRequest>,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    req.validate()?;
    let count = state
        .item_service
        .bulk_update_category(&auth, &req.ids, req.category_id)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}
