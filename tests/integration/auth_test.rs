//! Login against a real user table.

use axum::http::StatusCode;
use serde_json::json;

use warehouse_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_login_success() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    app.create_user("kladovshik", "password123", UserRole::Warehouse)
        .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "kladovshik", "password": "password123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data()["access_token"].is_string());
    assert_eq!(response.data()["user"]["role"], json!("warehouse"));
    assert!(response.data()["user"].get("password_hash").is_none());

    let token = response.data()["access_token"].as_str().unwrap();
    let me = app.request("GET", "/api/auth/me", None, Some(token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["name"], json!("kladovshik"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    app.create_user("manager", "password123", UserRole::Management)
        .await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "manager", "password": "wrongpassword" })),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "nobody", "password": "password123" })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["message"], unknown_user.body["message"]);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::offline().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "admin", "password": "" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}
