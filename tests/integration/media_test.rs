//! Local image serving.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use crate::helpers::TestApp;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[tokio::test]
async fn test_serves_image_from_media_root() {
    let app = TestApp::offline().await;
    let dir = app.media_root().join("warehouse/clothing");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("tshirt.png"), PNG_MAGIC).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/storage/local/warehouse/clothing/tshirt.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], PNG_MAGIC);

    let _ = tokio::fs::remove_dir_all(app.media_root()).await;
}

#[tokio::test]
async fn test_missing_image_is_not_found() {
    let app = TestApp::offline().await;

    let response = app
        .request("GET", "/api/storage/local/warehouse/missing.webp", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let app = TestApp::offline().await;
    let secret = app.media_root().with_extension("secret");
    tokio::fs::create_dir_all(app.media_root()).await.unwrap();
    tokio::fs::write(&secret, b"do not serve").await.unwrap();
    let name = secret.file_name().unwrap().to_string_lossy().to_string();

    let response = app
        .request(
            "GET",
            &format!("/api/storage/local/..%2F{name}"),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let _ = tokio::fs::remove_file(&secret).await;
    let _ = tokio::fs::remove_dir_all(app.media_root()).await;
}
