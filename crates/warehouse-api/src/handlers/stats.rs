//! Dashboard statistics handler.

use axum::Json;
use axum::extract::State;

use warehouse_service::report::WarehouseStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/warehouse/stats
pub async fn warehouse_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<WarehouseStats>>> {
    let stats = state.stats_service.stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
