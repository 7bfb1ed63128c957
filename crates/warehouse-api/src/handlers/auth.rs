//! Auth handlers: login and current user.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use warehouse_service::RequestContext;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AuthUser};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    req.validate()?;

    let result = state.auth_service.login(&req.username, &req.password).await?;

    Ok(Json(ApiResponse::ok(result.into())))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<RequestContext>> {
    Json(ApiResponse::ok(auth.0))
}
