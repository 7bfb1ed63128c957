//! Item image upload and removal.

use axum::Json;
use axum::extract::{Multipart, State};
use tracing::debug;
use uuid::Uuid;

use warehouse_core::error::AppError;
use warehouse_entity::item::{ImageSlot, InventoryItem};
use warehouse_service::item::ImageUpload;

use crate::dto::request::ImageIndexQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AppPath, AppQuery, AuthUser};
use crate::state::AppState;

/// POST /api/warehouse/items/{id}/images
///
/// Multipart fields `image`, `image_back`, `image_side` and any number of
/// `image_details`. Fields with other names are ignored.
pub async fn upload_images(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let Some(slot) = ImageSlot::from_field(&name) else {
            debug!(field = %name, "Skipping unknown multipart field");
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;

        uploads.push(ImageUpload {
            slot,
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let item = state
        .item_image_service
        .upload_images(&auth, id, uploads)
        .await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// DELETE /api/warehouse/items/{id}/images/{slot}
pub async fn delete_image(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, slot)): AppPath<(Uuid, ImageSlot)>,
    AppQuery(query): AppQuery<ImageIndexQuery>,
) -> ApiResult<Json<ApiResponse<InventoryItem>>> {
    let item = state
        .item_image_service
        .delete_image(&auth, id, slot, query.index)
        .await?;
    Ok(Json(ApiResponse::ok(item)))
}
