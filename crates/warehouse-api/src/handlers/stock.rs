//! Stock ledger handlers: adjust, transfer, move, bulk move and sync.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use warehouse_core::types::pagination::PageResponse;
use warehouse_entity::item::InventoryItem;
use warehouse_entity::stock::{StockWithLocation, TransactionView};
use warehouse_service::stock::{
    AdjustStockRequest, BulkMoveRequest, BulkMoveSummary, MoveItemRequest, TransferStockRequest,
};

use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AppPath, AppQuery, AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/warehouse/items/{id}/adjust
pub async fn adjust_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<AdjustStockRequest>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state.ledger_service.adjust_stock(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/warehouse/items/{id}/transfer
pub async fn transfer_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<TransferStockRequest>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state.ledger_service.transfer_stock(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/warehouse/items/{id}/move
pub async fn move_item(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<MoveItemRequest>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state.ledger_service.move_item(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// GET /api/warehouse/items/{id}/stocks
pub async fn item_stocks(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<StockWithLocation>>>> {
    let stocks = state.ledger_service.item_stocks(id).await?;
    Ok(Json(ApiResponse::ok(stocks)))
}

/// GET /api/warehouse/items/{id}/history
pub async fn item_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<TransactionView>>>> {
    let page = params.into_page_request();
    let history = state.history_service.item_history(id, &page).await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// POST /api/warehouse/stock/bulk-move
pub async fn bulk_move(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<BulkMoveRequest>,
) -> ApiResult<Json<ApiResponse<BulkMoveSummary>>> {
    let summary = state.ledger_service.bulk_move(&auth, req).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/warehouse/stock/sync
pub async fn sync_quantities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.ledger_service.sync_quantities(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}
