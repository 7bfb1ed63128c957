//! End-to-end warehouse flows against a real database.

use axum::http::StatusCode;
use serde_json::{Value, json};

use warehouse_entity::user::UserRole;

use crate::helpers::TestApp;

const PASSWORD: &str = "password123";

async fn admin_session(app: &TestApp) -> String {
    app.create_user("admin", PASSWORD, UserRole::Admin).await;
    app.login("admin", PASSWORD).await
}

async fn create_location(app: &TestApp, token: &str, name: &str, is_default: bool) -> String {
    let response = app
        .request(
            "POST",
            "/api/warehouse/locations",
            Some(json!({
                "name": name,
                "address": "ул. Складская, 1",
                "type": "warehouse",
                "is_default": is_default,
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["id"].as_str().unwrap().to_string()
}

async fn create_tshirt_category(app: &TestApp, token: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/warehouse/categories",
            Some(json!({ "name": "Футболка", "prefix": "TS", "gender": "feminine" })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["id"].as_str().unwrap().to_string()
}

async fn adjust(app: &TestApp, token: &str, item: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .request(
            "POST",
            &format!("/api/warehouse/items/{item}/adjust"),
            Some(body),
            Some(token),
        )
        .await;
    (response.status, response.body)
}

#[tokio::test]
async fn test_item_lifecycle() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    let main = create_location(&app, &token, "Основной склад", true).await;
    let office = create_location(&app, &token, "Офис", false).await;
    let category = create_tshirt_category(&app, &token).await;

    // Create with generated identity and initial stock at the default location.
    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({
                "category_id": category,
                "item_type": "clothing",
                "brand_code": "MRC",
                "color_code": "BLK",
                "unit": "кг",
                "quantity": 10,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let item = created.data()["id"].as_str().unwrap().to_string();
    let sku = created.data()["sku"].as_str().unwrap().to_string();
    assert!(sku.starts_with("TS-"), "sku {sku}");
    assert!(sku.contains("BLK"));
    assert!(created.data()["name"].as_str().unwrap().starts_with("Футболка"));
    assert_eq!(created.data()["quantity"], json!(10));
    assert_eq!(created.data()["unit"], json!("шт."));

    let stocks = app
        .request("GET", &format!("/api/warehouse/items/{item}/stocks"), None, Some(&token))
        .await;
    assert_eq!(stocks.data().as_array().unwrap().len(), 1);
    assert_eq!(stocks.data()[0]["storage_location_id"], json!(main));

    // Same SKU again conflicts.
    let duplicate = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "name": "Другая футболка", "sku": sku.to_lowercase() })),
            Some(&token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let check = app
        .request(
            "POST",
            "/api/warehouse/items/check-duplicate",
            Some(json!({ "name": "Что угодно", "sku": sku.to_lowercase() })),
            Some(&token),
        )
        .await;
    assert_eq!(check.data()["duplicate"]["type"], json!("sku_exact"));
    assert_eq!(check.data()["duplicate"]["duplicate"]["id"], json!(item));

    // Stock out, then refuse to go negative.
    let (status, body) = adjust(
        &app,
        &token,
        &item,
        json!({ "amount": 3, "type": "out", "reason": "Продажа", "storage_location_id": main }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["data"]["quantity"], json!(7));

    let (status, _) = adjust(
        &app,
        &token,
        &item,
        json!({ "amount": 100, "type": "out", "reason": "Ошибка", "storage_location_id": main }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Transfer keeps the total and splits the rows.
    let transfer = app
        .request(
            "POST",
            &format!("/api/warehouse/items/{item}/transfer"),
            Some(json!({ "from_location_id": main, "to_location_id": office, "amount": 2 })),
            Some(&token),
        )
        .await;
    assert_eq!(transfer.status, StatusCode::OK, "{:?}", transfer.body);
    assert_eq!(transfer.data()["quantity"], json!(7));

    let history = app
        .request("GET", &format!("/api/warehouse/items/{item}/history"), None, Some(&token))
        .await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.data()["total_items"], json!(3));

    // Cannot archive with stock on hand.
    let archive = app
        .request(
            "POST",
            "/api/warehouse/items/archive",
            Some(json!({ "ids": [item], "reason": "Снято с продажи" })),
            Some(&token),
        )
        .await;
    assert_eq!(archive.status, StatusCode::BAD_REQUEST);

    // Consolidate at the office, zero it, then archive and restore.
    let moved = app
        .request(
            "POST",
            "/api/warehouse/stock/bulk-move",
            Some(json!({ "item_ids": [item], "target_location_id": office })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["moved"], json!(1));

    let (status, body) = adjust(
        &app,
        &token,
        &item,
        json!({ "amount": 0, "type": "set", "reason": "Инвентаризация", "storage_location_id": office }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["data"]["quantity"], json!(0));

    for (path, reason) in [
        ("archive", "Снято с продажи"),
        ("restore", "Вернули в продажу"),
        ("archive", "Окончательно"),
    ] {
        let response = app
            .request(
                "POST",
                &format!("/api/warehouse/items/{path}"),
                Some(json!({ "ids": [item], "reason": reason })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{path}: {:?}", response.body);
        assert_eq!(response.data()["count"], json!(1));
    }

    // Deleting an item with history needs the password.
    let wrong = app
        .request(
            "POST",
            "/api/warehouse/items/delete",
            Some(json!({ "ids": [item], "password": "not-my-password" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let deleted = app
        .request(
            "POST",
            "/api/warehouse/items/delete",
            Some(json!({ "ids": [item], "password": PASSWORD })),
            Some(&token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK, "{:?}", deleted.body);

    let gone = app
        .request("GET", &format!("/api/warehouse/items/{item}"), None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let audit = app
        .request("GET", "/api/warehouse/audit-log?action=stock", None, Some(&token))
        .await;
    assert_eq!(audit.status, StatusCode::OK);
    let entries = audit.data()["items"].as_array().unwrap().clone();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| e["action"].as_str().unwrap().starts_with("stock.")));
    assert_eq!(entries[0]["actor_name"], json!("admin"));
}

#[tokio::test]
async fn test_location_with_stock_cannot_be_deleted() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    let main = create_location(&app, &token, "Основной склад", true).await;

    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "name": "Коробка 30x20", "item_type": "packaging", "quantity": 5 })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert!(created.data()["sku"].is_null());

    let blocked = app
        .request("DELETE", &format!("/api/warehouse/locations/{main}"), None, Some(&token))
        .await;
    assert_eq!(blocked.status, StatusCode::BAD_REQUEST);

    let locations = app
        .request("GET", "/api/warehouse/locations", None, Some(&token))
        .await;
    assert_eq!(locations.status, StatusCode::OK);
    assert_eq!(locations.data()[0]["items"][0]["quantity"], json!(5));
}

#[tokio::test]
async fn test_category_list_reflects_new_items() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    create_location(&app, &token, "Основной склад", true).await;
    let category = create_tshirt_category(&app, &token).await;

    let before = app
        .request("GET", "/api/warehouse/categories", None, Some(&token))
        .await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.data().as_array().unwrap().len(), 1);

    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "category_id": category, "color_code": "WHT" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);

    let orphaned = app
        .request("GET", "/api/warehouse/items/orphaned-count", None, Some(&token))
        .await;
    assert_eq!(orphaned.data()["count"], json!(0));

    let items = app
        .request(
            "GET",
            &format!("/api/warehouse/items?category_ids={category}&status=out"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(items.status, StatusCode::OK);
    assert_eq!(items.data()["total_items"], json!(1));
}

async fn create_category(app: &TestApp, token: &str, name: &str, parent: Option<&str>) -> String {
    let response = app
        .request(
            "POST",
            "/api/warehouse/categories",
            Some(json!({ "name": name, "parent_id": parent })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["id"].as_str().unwrap().to_string()
}

async fn full_path(app: &TestApp, token: &str, id: &str) -> Value {
    let response = app
        .request("GET", &format!("/api/warehouse/categories/{id}"), None, Some(token))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.data()["full_path"].clone()
}

#[tokio::test]
async fn test_category_rename_and_move_rewrite_descendant_paths() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    let clothing = create_category(&app, &token, "Одежда", None).await;
    let tshirt = create_category(&app, &token, "Футболка", Some(&clothing)).await;
    let oversize = create_category(&app, &token, "Оверсайз", Some(&tshirt)).await;
    let merch = create_category(&app, &token, "Мерч", None).await;
    assert_eq!(
        full_path(&app, &token, &oversize).await,
        json!("Одежда > Футболка > Оверсайз")
    );

    let renamed = app
        .request(
            "PUT",
            &format!("/api/warehouse/categories/{clothing}"),
            Some(json!({ "name": "Текстиль" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK, "{:?}", renamed.body);
    assert_eq!(full_path(&app, &token, &tshirt).await, json!("Текстиль > Футболка"));
    assert_eq!(
        full_path(&app, &token, &oversize).await,
        json!("Текстиль > Футболка > Оверсайз")
    );

    let moved = app
        .request(
            "PUT",
            &format!("/api/warehouse/categories/{tshirt}"),
            Some(json!({ "name": "Футболка", "parent_id": merch })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(
        full_path(&app, &token, &oversize).await,
        json!("Мерч > Футболка > Оверсайз")
    );

    let paths = app
        .request(
            "GET",
            &format!("/api/warehouse/categories/{oversize}/paths?ancestor={merch}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(paths.status, StatusCode::OK, "{:?}", paths.body);
    assert_eq!(paths.data()["display_path"], json!("Мерч > Футболка > Оверсайз"));
    assert_eq!(paths.data()["storage_path"], json!("Мерч/Футболка/Оверсайз"));
    assert_eq!(paths.data()["descends_from"], json!(true));

    let unrelated = app
        .request(
            "GET",
            &format!("/api/warehouse/categories/{oversize}/paths?ancestor={clothing}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(unrelated.data()["descends_from"], json!(false));

    let plain = app
        .request(
            "GET",
            &format!("/api/warehouse/categories/{merch}/paths"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(plain.data()["storage_path"], json!("Мерч"));
    assert!(plain.data().get("descends_from").is_none());

    let missing = app
        .request(
            "GET",
            &format!("/api/warehouse/categories/{}/paths", uuid::Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_cannot_move_under_its_grandchild() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    let root = create_category(&app, &token, "Одежда", None).await;
    let child = create_category(&app, &token, "Футболка", Some(&root)).await;
    let grandchild = create_category(&app, &token, "Оверсайз", Some(&child)).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/warehouse/categories/{root}"),
            Some(json!({ "name": "Одежда", "parent_id": grandchild })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", response.body);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert_eq!(full_path(&app, &token, &root).await, json!("Одежда"));
}

#[tokio::test]
async fn test_move_item_records_transfer() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    let main = create_location(&app, &token, "Основной склад", true).await;
    let office = create_location(&app, &token, "Офис", false).await;

    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "name": "Лента упаковочная", "item_type": "packaging", "quantity": 6 })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let item = created.data()["id"].as_str().unwrap().to_string();

    let moved = app
        .request(
            "POST",
            &format!("/api/warehouse/items/{item}/move"),
            Some(json!({
                "from_location_id": main,
                "to_location_id": office,
                "quantity": 4,
                "comment": "На упаковку",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["quantity"], json!(6));

    let item_id: uuid::Uuid = item.parse().unwrap();
    let transfers: Vec<(uuid::Uuid, uuid::Uuid, i32, Option<String>)> = sqlx::query_as(
        "SELECT from_location_id, to_location_id, quantity, comment \
         FROM inventory_transfers WHERE item_id = $1",
    )
    .bind(item_id)
    .fetch_all(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].0.to_string(), main);
    assert_eq!(transfers[0].1.to_string(), office);
    assert_eq!(transfers[0].2, 4);
    assert_eq!(transfers[0].3.as_deref(), Some("На упаковку"));
}

#[tokio::test]
async fn test_attribute_code_change_regenerates_item_skus() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    create_location(&app, &token, "Основной склад", true).await;
    let category = create_tshirt_category(&app, &token).await;

    let color_type = app
        .request(
            "POST",
            "/api/warehouse/attribute-types",
            Some(json!({ "name": "Цвет", "slug": "color" })),
            Some(&token),
        )
        .await;
    assert_eq!(color_type.status, StatusCode::OK, "{:?}", color_type.body);
    let black = app
        .request(
            "POST",
            "/api/warehouse/attributes",
            Some(json!({ "type_slug": "color", "name": "Черный", "code": "BLK" })),
            Some(&token),
        )
        .await;
    assert_eq!(black.status, StatusCode::OK, "{:?}", black.body);
    let attribute = black.data()["id"].as_str().unwrap().to_string();

    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "category_id": category, "item_type": "clothing", "color_code": "BLK" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let item = created.data()["id"].as_str().unwrap().to_string();
    assert!(created.data()["sku"].as_str().unwrap().contains("BLK"));

    let updated = app
        .request(
            "PUT",
            &format!("/api/warehouse/attributes/{attribute}"),
            Some(json!({ "name": "Черный", "code": "NOIR" })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{:?}", updated.body);

    let reloaded = app
        .request("GET", &format!("/api/warehouse/items/{item}"), None, Some(&token))
        .await;
    assert_eq!(reloaded.data()["color_code"], json!("NOIR"));
    let sku = reloaded.data()["sku"].as_str().unwrap();
    assert!(sku.starts_with("TS-"), "sku {sku}");
    assert!(sku.contains("NOIR"), "sku {sku}");
    assert!(!sku.contains("BLK"), "sku {sku}");

    let regenerated = app
        .request("POST", "/api/warehouse/items/regenerate-skus", None, Some(&token))
        .await;
    assert_eq!(regenerated.status, StatusCode::OK, "{:?}", regenerated.body);
    assert_eq!(regenerated.data()["total"], json!(1));
    let updated = regenerated.data()["updated"].clone();
    assert!(updated.as_u64().is_some_and(|n| n <= 1), "{updated}");

    let audit = app
        .request(
            "GET",
            "/api/warehouse/audit-log?action=item.regenerate_skus",
            None,
            Some(&token),
        )
        .await;
    let entries = audit.data()["items"].as_array().unwrap().clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["details"]["updated"], updated);
    assert_eq!(entries[0]["details"]["total"], json!(1));
}

#[tokio::test]
async fn test_bulk_move_skips_missing_items() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    let main = create_location(&app, &token, "Основной склад", true).await;
    let office = create_location(&app, &token, "Офис", false).await;

    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "name": "Скотч", "item_type": "packaging", "quantity": 3 })),
            Some(&token),
        )
        .await;
    let item = created.data()["id"].as_str().unwrap().to_string();

    let moved = app
        .request(
            "POST",
            "/api/warehouse/stock/bulk-move",
            Some(json!({
                "item_ids": [uuid::Uuid::new_v4(), item],
                "target_location_id": office,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["moved"], json!(1));
    assert_eq!(moved.data()["skipped"], json!(1));

    let stocks = app
        .request("GET", &format!("/api/warehouse/items/{item}/stocks"), None, Some(&token))
        .await;
    let rows = stocks.data().as_array().unwrap().clone();
    assert!(rows.iter().all(|r| r["storage_location_id"] != json!(main) || r["quantity"] == json!(0)));
}

#[tokio::test]
async fn test_stats_split_usage_and_waste() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    let main = create_location(&app, &token, "Основной склад", true).await;
    let office = create_location(&app, &token, "Офис", false).await;

    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "name": "Краска белая", "item_type": "consumables", "quantity": 10 })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let item = created.data()["id"].as_str().unwrap().to_string();

    for (amount, reason) in [(2, "Брак при печати"), (1, "Производство заказа")] {
        let (status, body) = adjust(
            &app,
            &token,
            &item,
            json!({ "amount": amount, "type": "out", "reason": reason, "storage_location_id": main }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body:?}");
    }
    let moved = app
        .request(
            "POST",
            &format!("/api/warehouse/items/{item}/move"),
            Some(json!({ "from_location_id": main, "to_location_id": office, "quantity": 2 })),
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);

    let stats = app
        .request("GET", "/api/warehouse/stats", None, Some(&token))
        .await;
    assert_eq!(stats.status, StatusCode::OK, "{:?}", stats.body);
    let data = stats.data();
    assert_eq!(data["total_stock"], json!(7));
    assert_eq!(data["total_reserved"], json!(0));
    assert_eq!(data["archived_count"], json!(0));
    assert_eq!(data["critical_items"][0]["id"], json!(item));
    assert_eq!(
        data["activity"],
        json!({ "ins": 1, "usage": 1, "waste": 1, "transfers": 1 })
    );
}

#[tokio::test]
async fn test_seed_locations_is_idempotent() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;

    let first = app
        .request("POST", "/api/warehouse/locations/seed", None, Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);
    assert_eq!(first.data(), &json!({ "created": 4, "existing": 0 }));

    let second = app
        .request("POST", "/api/warehouse/locations/seed", None, Some(&token))
        .await;
    assert_eq!(second.data(), &json!({ "created": 0, "existing": 4 }));

    let locations = app
        .request("GET", "/api/warehouse/locations", None, Some(&token))
        .await;
    let names: Vec<_> = locations
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 4);
    assert!(names.contains(&"Производство".to_string()));
}

const BOUNDARY: &str = "warehouse-test-boundary";

fn multipart_body(parts: &[(&str, &str, &str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, content_type, contents) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(
    app: &TestApp,
    token: &str,
    item: &str,
    parts: &[(&str, &str, &str, &str)],
) -> crate::helpers::TestResponse {
    let request = axum::http::Request::post(format!("/api/warehouse/items/{item}/images"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::from(multipart_body(parts)))
        .unwrap();
    app.send(request).await
}

/// Percent-encodes everything but unreserved characters and `/`.
fn encode_path(path: &str) -> String {
    path.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

fn local_file(app: &TestApp, url: &Value) -> std::path::PathBuf {
    let relative = url
        .as_str()
        .unwrap()
        .strip_prefix("/api/storage/local/")
        .unwrap();
    app.media_root().join(relative)
}

#[tokio::test]
async fn test_item_images_upload_replace_and_delete() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let token = admin_session(&app).await;
    create_location(&app, &token, "Основной склад", true).await;
    let category = create_tshirt_category(&app, &token).await;
    let created = app
        .request(
            "POST",
            "/api/warehouse/items",
            Some(json!({ "name": "Футболка белая", "category_id": category })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let item = created.data()["id"].as_str().unwrap().to_string();

    let first = upload(
        &app,
        &token,
        &item,
        &[
            ("image", "front.png", "image/png", "front-v1"),
            ("image_details", "d1.jpg", "image/jpeg", "detail-1"),
            ("image_details", "d2.webp", "image/webp", "detail-2"),
        ],
    )
    .await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);
    let front_v1 = first.data()["image"].clone();
    assert!(
        front_v1
            .as_str()
            .unwrap()
            .starts_with("/api/storage/local/SKU/Футболка/Футболка белая/item-"),
        "{front_v1}"
    );
    assert!(front_v1.as_str().unwrap().ends_with(".png"));
    assert_eq!(first.data()["image_details"].as_array().unwrap().len(), 2);
    let old_front = local_file(&app, &front_v1);
    assert_eq!(tokio::fs::read(&old_front).await.unwrap(), b"front-v1");

    // Uploaded files are served from the media route.
    let served = app
        .send(
            axum::http::Request::get(encode_path(front_v1.as_str().unwrap()))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(served.status, StatusCode::OK);

    // Replacing the front image removes the old file.
    let second = upload(&app, &token, &item, &[("image", "front.png", "image/png", "front-v2")]).await;
    assert_eq!(second.status, StatusCode::OK, "{:?}", second.body);
    assert_ne!(second.data()["image"], front_v1);
    assert!(!old_front.exists());

    let rejected = upload(&app, &token, &item, &[("image_back", "notes.txt", "text/plain", "hi")]).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);

    let detail = second.data()["image_details"][0].clone();
    let deleted = app
        .request(
            "DELETE",
            &format!("/api/warehouse/items/{item}/images/details?index=0"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK, "{:?}", deleted.body);
    assert_eq!(deleted.data()["image_details"].as_array().unwrap().len(), 1);
    assert!(!local_file(&app, &detail).exists());

    let absent = app
        .request(
            "DELETE",
            &format!("/api/warehouse/items/{item}/images/back"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(absent.status, StatusCode::NOT_FOUND);

    let _ = tokio::fs::remove_dir_all(app.media_root()).await;
}
