//! Item image upload and removal under the local media root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use warehouse_auth::{RbacEnforcer, WarehousePermission};
use warehouse_core::config::MediaConfig;
use warehouse_core::error::{AppError, ErrorKind};
use warehouse_database::connection::commit;
use warehouse_database::repositories::item::ItemRepository;
use warehouse_entity::category::tree::sanitize_segment;
use warehouse_entity::item::{ImageSlot, InventoryItem, ItemImages};

use crate::audit::AuditService;
use crate::audit::service::TARGET_ITEM;
use crate::cache::WarehouseCache;
use crate::category::CategoryService;
use crate::context::RequestContext;

/// Top-level media directory for item images.
pub const IMAGE_ROOT: &str = "SKU";

/// Extensions stored as uploaded.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "avif"];

/// One uploaded image file.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Slot the image goes to.
    pub slot: ImageSlot,
    /// Client file name, used for the extension only.
    pub file_name: Option<String>,
    /// Declared MIME type.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Stores item images and keeps the item's image fields in step.
#[derive(Debug, Clone)]
pub struct ItemImageService {
    /// Item repository.
    item_repo: Arc<ItemRepository>,
    /// Category paths for the image directory.
    category_service: Arc<CategoryService>,
    /// Warehouse cache.
    cache: Arc<WarehouseCache>,
    /// Audit writer.
    audit: Arc<AuditService>,
    /// Role checks.
    rbac: Arc<RbacEnforcer>,
    /// Media root and URL prefix.
    media: MediaConfig,
}

impl ItemImageService {
    /// Creates a new image service.
    pub fn new(
        item_repo: Arc<ItemRepository>,
        category_service: Arc<CategoryService>,
        cache: Arc<WarehouseCache>,
        audit: Arc<AuditService>,
        rbac: Arc<RbacEnforcer>,
        media: MediaConfig,
    ) -> Self {
        Self {
            item_repo,
            category_service,
            cache,
            audit,
            rbac,
            media,
        }
    }

    /// Writes `uploads` under `SKU/<category path>/<item name>/` and points
    /// the item's slots at them. Replaced local files are removed.
    pub async fn upload_images(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        uploads: Vec<ImageUpload>,
    ) -> Result<InventoryItem, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemWrite)?;

        if uploads.is_empty() {
            return Err(AppError::validation("No images uploaded"));
        }
        let extensions = uploads
            .iter()
            .map(|upload| check_upload(upload, self.media.max_image_bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.item_repo.begin().await?;
        let item = self
            .item_repo
            .find_for_update(&mut *tx, item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found")))?;

        let category_path = self.category_service.storage_path(item.category_id).await?;
        let dir = image_dir(&category_path, &item.name);
        let full_dir = Path::new(&self.media.root).join(&dir);
        tokio::fs::create_dir_all(&full_dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create image directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut images = ItemImages::from_item(&item);
        let mut written = Vec::with_capacity(uploads.len());
        let mut replaced = Vec::new();
        let mut slots = Vec::with_capacity(uploads.len());

        for (upload, ext) in uploads.iter().zip(extensions) {
            let file_name = image_file_name(ext);
            let full_path = full_dir.join(&file_name);
            if let Err(e) = tokio::fs::write(&full_path, &upload.bytes).await {
                remove_files(&written).await;
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to write image '{file_name}'"),
                    e,
                ));
            }
            written.push(full_path);

            let url = self.media.url_for(&dir.join(&file_name));
            if let Some(old) = images.set(upload.slot, url) {
                replaced.push(old);
            }
            slots.push(upload.slot.as_str());
        }

        let stored = match self.item_repo.update_images(&mut *tx, item_id, &images).await {
            Ok(stored) => stored,
            Err(e) => {
                remove_files(&written).await;
                return Err(e);
            }
        };
        if let Err(e) = commit(tx).await {
            remove_files(&written).await;
            return Err(e);
        }

        let stale: Vec<PathBuf> = replaced
            .iter()
            .filter_map(|url| self.media.path_for_url(url))
            .collect();
        remove_files(&stale).await;

        info!(
            user_id = %ctx.user_id,
            item_id = %item_id,
            uploaded = written.len(),
            replaced = replaced.len(),
            "Item images uploaded"
        );
        self.audit
            .log(
                ctx,
                "item.images_upload",
                TARGET_ITEM,
                Some(item_id),
                json!({ "slots": slots, "replaced": replaced }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(stored)
    }

    /// Clears `slot`, or removes the detail image at `index`, and deletes
    /// the local file behind it.
    pub async fn delete_image(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        slot: ImageSlot,
        index: Option<usize>,
    ) -> Result<InventoryItem, AppError> {
        self.rbac
            .require_permission(ctx.role, WarehousePermission::ItemWrite)?;

        let mut tx = self.item_repo.begin().await?;
        let item = self
            .item_repo
            .find_for_update(&mut *tx, item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found")))?;

        let mut images = ItemImages::from_item(&item);
        let removed = images
            .remove(slot, index)
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} has no {slot} image")))?;

        let stored = self.item_repo.update_images(&mut *tx, item_id, &images).await?;
        commit(tx).await?;

        if let Some(path) = self.media.path_for_url(&removed) {
            remove_files(&[path]).await;
        }

        info!(
            user_id = %ctx.user_id,
            item_id = %item_id,
            slot = %slot,
            "Item image deleted"
        );
        self.audit
            .log(
                ctx,
                "item.image_delete",
                TARGET_ITEM,
                Some(item_id),
                json!({ "slot": slot, "index": index, "url": removed }),
            )
            .await;
        self.cache.invalidate().await;

        Ok(stored)
    }
}

/// Validates one upload and picks the extension it is stored with.
fn check_upload(upload: &ImageUpload, max_bytes: usize) -> Result<&'static str, AppError> {
    if upload.bytes.is_empty() {
        return Err(AppError::validation(format!(
            "Empty file for the {} image",
            upload.slot
        )));
    }
    if upload.bytes.len() > max_bytes {
        return Err(AppError::validation(format!(
            "The {} image exceeds {max_bytes} bytes",
            upload.slot
        )));
    }
    if let Some(mime) = upload.content_type.as_deref() {
        if !mime.starts_with("image/") {
            return Err(AppError::validation(format!(
                "Unsupported content type '{mime}' for the {} image",
                upload.slot
            )));
        }
    }
    Ok(image_extension(
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
    ))
}

/// Extension from the file name, then the MIME type, defaulting to `jpg`.
fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> &'static str {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| IMAGE_EXTENSIONS.iter().copied().find(|known| *known == ext));

    from_name
        .or_else(|| match content_type? {
            "image/png" => Some("png"),
            "image/webp" => Some("webp"),
            "image/gif" => Some("gif"),
            "image/avif" => Some("avif"),
            _ => None,
        })
        .unwrap_or("jpg")
}

/// Directory relative to the media root: `SKU/<category path>/<item name>`.
fn image_dir(category_path: &str, item_name: &str) -> PathBuf {
    let mut dir = PathBuf::from(IMAGE_ROOT);
    for segment in category_path.split('/').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    let item_segment = sanitize_segment(item_name);
    if item_segment.is_empty() {
        dir.push("unnamed");
    } else {
        dir.push(item_segment);
    }
    dir
}

fn image_file_name(ext: &str) -> String {
    format!("item-{}.{ext}", Uuid::now_v7().simple())
}

async fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to remove image file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: Option<&str>, bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            slot: ImageSlot::Front,
            file_name: Some("photo.PNG".into()),
            content_type: content_type.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_image_dir_sanitizes_item_name() {
        assert_eq!(
            image_dir("Одежда/Футболка", "Футболка: белая / XL"),
            PathBuf::from("SKU/Одежда/Футболка/Футболка_ белая _ XL")
        );
        assert_eq!(
            image_dir("Uncategorized", "..."),
            PathBuf::from("SKU/Uncategorized/unnamed")
        );
    }

    #[test]
    fn test_extension_prefers_file_name() {
        assert_eq!(image_extension(Some("a.WEBP"), Some("image/png")), "webp");
        assert_eq!(image_extension(Some("a.exe"), Some("image/png")), "png");
        assert_eq!(image_extension(None, Some("image/jpeg")), "jpg");
        assert_eq!(image_extension(Some("noext"), None), "jpg");
    }

    #[test]
    fn test_check_upload_rejects_non_images() {
        assert_eq!(check_upload(&upload(Some("image/png"), b"png"), 16).ok(), Some("png"));
        assert_eq!(check_upload(&upload(None, b"png"), 16).ok(), Some("png"));

        let kind = |u: ImageUpload, max| check_upload(&u, max).map_err(|e| e.kind);
        assert_eq!(kind(upload(Some("text/plain"), b"x"), 16), Err(ErrorKind::Validation));
        assert_eq!(kind(upload(Some("image/png"), b""), 16), Err(ErrorKind::Validation));
        assert_eq!(kind(upload(Some("image/png"), b"too large"), 4), Err(ErrorKind::Validation));
    }

    #[test]
    fn test_file_names_are_unique() {
        let a = image_file_name("jpg");
        let b = image_file_name("jpg");
        assert!(a.starts_with("item-") && a.ends_with(".jpg"));
        assert_ne!(a, b);
    }
}
