//! Attribute type and attribute handlers.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use uuid::Uuid;

use warehouse_entity::attribute::{Attribute, AttributeType};
use warehouse_service::attribute::{
    AttributeRequest, AttributeSeedSummary, AttributeTypeRequest, AttributeUpdateRequest,
};

use super::confirm_password;
use crate::dto::request::AttributesQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AppPath, AppQuery, AuthUser};
use crate::state::AppState;

/// GET /api/warehouse/attribute-types
pub async fn list_types(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<AttributeType>>>> {
    let types = state.attribute_service.list_types().await?;
    Ok(Json(ApiResponse::ok(types)))
}

/// POST /api/warehouse/attribute-types
pub async fn create_type(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<AttributeTypeRequest>,
) -> ApiResult<Json<ApiResponse<AttributeType>>> {
    let attribute_type = state.attribute_service.create_type(&auth, req).await?;
    Ok(Json(ApiResponse::ok(attribute_type)))
}

/// PUT /api/warehouse/attribute-types/{id}
pub async fn update_type(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<AttributeTypeRequest>,
) -> ApiResult<Json<ApiResponse<AttributeType>>> {
    let attribute_type = state.attribute_service.update_type(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(attribute_type)))
}

/// DELETE /api/warehouse/attribute-types/{id}
pub async fn delete_type(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let password = confirm_password(&headers);
    state
        .attribute_service
        .delete_type(&auth, id, password.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Attribute type deleted",
    ))))
}

/// GET /api/warehouse/attributes?type=...
pub async fn list_attributes(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppQuery(query): AppQuery<AttributesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Attribute>>>> {
    let attributes = state
        .attribute_service
        .list_attributes(query.type_slug.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(attributes)))
}

/// POST /api/warehouse/attributes
pub async fn create_attribute(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<AttributeRequest>,
) -> ApiResult<Json<ApiResponse<Attribute>>> {
    let attribute = state.attribute_service.create_attribute(&auth, req).await?;
    Ok(Json(ApiResponse::ok(attribute)))
}

/// PUT /api/warehouse/attributes/{id}
pub async fn update_attribute(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<AttributeUpdateRequest>,
) -> ApiResult<Json<ApiResponse<Attribute>>> {
    let attribute = state
        .attribute_service
        .update_attribute(&auth, id, req)
        .await?;
    Ok(Json(ApiResponse::ok(attribute)))
}

/// DELETE /api/warehouse/attributes/{id}
pub async fn delete_attribute(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.attribute_service.delete_attribute(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Attribute deleted"))))
}

/// POST /api/warehouse/attributes/seed
pub async fn seed_attributes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<AttributeSeedSummary>>> {
    let summary = state.attribute_service.seed_system_attributes(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
