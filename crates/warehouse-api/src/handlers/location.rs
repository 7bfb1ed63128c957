//! Storage location handlers.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use uuid::Uuid;

use warehouse_entity::location::{LocationWithItems, StorageLocation};
use warehouse_service::location::{LocationOrder, LocationRequest, LocationSeedSummary};

use super::confirm_password;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AppPath, AuthUser};
use crate::state::AppState;

/// GET /api/warehouse/locations
pub async fn list_locations(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<LocationWithItems>>>> {
    let locations = state.location_service.list_locations().await?;
    Ok(Json(ApiResponse::ok(locations)))
}

/// POST /api/warehouse/locations
pub async fn create_location(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<LocationRequest>,
) -> ApiResult<Json<ApiResponse<StorageLocation>>> {
    let location = state.location_service.create_location(&auth, req).await?;
    Ok(Json(ApiResponse::ok(location)))
}

/// PUT /api/warehouse/locations/{id}
pub async fn update_location(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<LocationRequest>,
) -> ApiResult<Json<ApiResponse<StorageLocation>>> {
    let location = state
        .location_service
        .update_location(&auth, id, req)
        .await?;
    Ok(Json(ApiResponse::ok(location)))
}

/// DELETE /api/warehouse/locations/{id}
pub async fn delete_location(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let password = confirm_password(&headers);
    state
        .location_service
        .delete_location(&auth, id, password.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Storage location deleted",
    ))))
}

/// PUT /api/warehouse/locations/order
pub async fn reorder_locations(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(order): AppJson<Vec<LocationOrder>>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .location_service
        .reorder_locations(&auth, order)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Location order saved",
    ))))
}

/// POST /api/warehouse/locations/seed
pub async fn seed_locations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<LocationSeedSummary>>> {
    let summary = state.location_service.seed_locations(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
