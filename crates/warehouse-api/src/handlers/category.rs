//! Category tree handlers.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use uuid::Uuid;

use warehouse_entity::category::{Category, CategoryWithStats};
use warehouse_service::category::{CategoryOrder, CategoryRequest, RebuildSummary, SeedSummary};

use super::confirm_password;
use crate::dto::request::CategoryPathsQuery;
use crate::dto::response::{ApiResponse, CategoryPaths, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AppPath, AppQuery, AuthUser};
use crate::state::AppState;

/// GET /api/warehouse/categories
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<CategoryWithStats>>>> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// GET /api/warehouse/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state.category_service.get_category(id).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// POST /api/warehouse/categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<CategoryRequest>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state.category_service.create_category(&auth, req).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// PUT /api/warehouse/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<CategoryRequest>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state
        .category_service
        .update_category(&auth, id, req)
        .await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// DELETE /api/warehouse/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let password = confirm_password(&headers);
    state
        .category_service
        .delete_category(&auth, id, password.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Category deleted"))))
}

/// PUT /api/warehouse/categories/order
pub async fn reorder_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(order): AppJson<Vec<CategoryOrder>>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .category_service
        .reorder_categories(&auth, order)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Category order saved",
    ))))
}

/// POST /api/warehouse/categories/rebuild-paths
pub async fn rebuild_paths(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<RebuildSummary>>> {
    let summary = state.category_service.rebuild_paths(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/warehouse/categories/seed
pub async fn seed_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<SeedSummary>>> {
    let summary = state.category_service.seed_system_categories(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/warehouse/categories/{id}/paths
pub async fn category_paths(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppQuery(query): AppQuery<CategoryPathsQuery>,
) -> ApiResult<Json<ApiResponse<CategoryPaths>>> {
    let service = &state.category_service;
    let display_path = service.display_path(id).await?;
    let storage_path = service.storage_path(Some(id)).await?;
    let descends_from = match query.ancestor {
        Some(ancestor) => Some(service.is_descendant(id, ancestor).await?),
        None => None,
    };
    Ok(Json(ApiResponse::ok(CategoryPaths {
        display_path,
        storage_path,
        descends_from,
    })))
}
