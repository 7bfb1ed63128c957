//! Ledger history and audit log handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use warehouse_core::types::pagination::PageResponse;
use warehouse_entity::audit::{AuditFilter, AuditLogEntry};
use warehouse_entity::stock::TransactionView;
use warehouse_service::history::HistoryFilter;

use crate::dto::request::{DeleteHistoryRequest, HistoryQuery};
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AppQuery, AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/warehouse/history
pub async fn list_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(params): AppQuery<PaginationParams>,
    AppQuery(query): AppQuery<HistoryQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<TransactionView>>>> {
    let filter = HistoryFilter::from(query);
    let page = params.into_page_request();
    let history = state.history_service.history(&filter, &page).await?;
    Ok(Json(ApiResponse::ok(history)))
}

/// POST /api/warehouse/history/delete
pub async fn delete_history(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<DeleteHistoryRequest>,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    req.validate()?;
    let count = state
        .history_service
        .delete_transactions(&auth, &req.ids)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}

/// DELETE /api/warehouse/history
pub async fn clear_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CountResponse>>> {
    let count = state.history_service.clear_history(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse::new(count))))
}

/// GET /api/warehouse/audit-log
pub async fn audit_log(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(params): AppQuery<PaginationParams>,
    AppQuery(filter): AppQuery<AuditFilter>,
) -> ApiResult<Json<ApiResponse<PageResponse<AuditLogEntry>>>> {
    let page = params.into_page_request();
    let entries = state.history_service.audit_log(&filter, &page).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
