//! Local media serving for item images.

use std::path::Path;

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::debug;

use warehouse_core::error::{AppError, ErrorKind};

use crate::error::ApiResult;
use crate::extractors::AppPath;
use crate::state::AppState;

/// GET /api/storage/local/{*path}
///
/// Images are referenced from `<img>` tags, so this route is public.
pub async fn serve_local(
    State(state): State<AppState>,
    AppPath(path): AppPath<String>,
) -> ApiResult<Response> {
    let full_path = state
        .config
        .media
        .resolve(&path)
        .ok_or_else(|| AppError::not_found(format!("File '{path}' not found")))?;
    let relative = full_path
        .strip_prefix(&state.config.media.root)
        .unwrap_or(full_path.as_path());

    let file = match tokio::fs::File::open(&full_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %relative.display(), "Media file not found");
            return Err(AppError::not_found(format!("File '{path}' not found")).into());
        }
        Err(e) => {
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to open media file '{}'", relative.display()),
                e,
            )
            .into());
        }
    };
    let metadata = file.metadata().await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to read media metadata", e)
    })?;
    if !metadata.is_file() {
        return Err(AppError::not_found(format!("File '{path}' not found")).into());
    }

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(relative))
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.config.media.max_age_seconds),
        )
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// MIME type from the file extension.
fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type(Path::new("a/B.JPG")), "image/jpeg");
        assert_eq!(content_type(Path::new("a/b.webp")), "image/webp");
        assert_eq!(content_type(Path::new("a/b")), "application/octet-stream");
    }
}
