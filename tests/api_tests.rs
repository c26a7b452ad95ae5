//! End-to-end API tests over the in-memory store

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use opensase_tailor::api::{self, AppState};
use opensase_tailor::config::Config;

fn app(upload_dir: &std::path::Path) -> Router {
    let config = Config { upload_dir: upload_dir.to_path_buf(), ..Config::default() };
    api::router(AppState::in_memory(config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn shirt_catalog() -> Value {
    json!({
        "fabrics": [
            { "id": "f1", "name": "Oxford", "priceModifier": 800, "frontImage": "/f1-front.png", "backImage": "/f1-back.png",
              "colors": [{ "name": "Sky", "hex": "#87ceeb" }] },
            { "id": "f2", "name": "Poplin" }
        ],
        "sleeves": [{ "id": "full", "name": "Full Sleeve" }, { "id": "half", "name": "Half Sleeve" }],
        "collars": [{ "id": "c1", "name": "Spread", "priceModifier": 300, "image": "/c1.png", "layersByFabric": { "f1": "/c1-f1.png" } }],
        "cuffs": [{ "id": "k1", "name": "Barrel", "priceModifier": -100 }],
        "neckties": [{ "id": "t1", "name": "Silk Tie" }],
        "bowties": [{ "id": "b1", "name": "Bow", "isDefault": true }]
    })
}

fn step_ids(session: &Value) -> Vec<String> {
    session["steps"].as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap().to_string()).collect()
}

async fn seeded() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let (status, _) = send(&app, Method::POST, "/api/data", Some(shirt_catalog())).await;
    assert_eq!(status, StatusCode::OK);
    (dir, app)
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(&app(dir.path()), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_global_catalog_round_trip() {
    let (_dir, app) = seeded().await;
    let (status, body) = send(&app, Method::GET, "/api/data", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fabrics"].as_array().unwrap().len(), 2);
    assert_eq!(body["collars"][0]["layersByFabric"]["f1"], "/c1-f1.png");
}

#[tokio::test]
async fn test_global_catalog_rejects_runaway_prices() {
    let (_dir, app) = seeded().await;
    let mut catalog = shirt_catalog();
    catalog["cuffs"][0]["priceModifier"] = json!(1_000_000_000_000_000i64);
    let (status, body) = send(&app, Method::POST, "/api/data", Some(catalog)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("k1"));

    // the previous catalog stays in place
    let (_, current) = send(&app, Method::GET, "/api/data", None).await;
    assert_eq!(current["cuffs"][0]["priceModifier"], -100);
}

#[tokio::test]
async fn test_shirt_session_steps_price_and_preview() {
    let (_dir, app) = seeded().await;
    let (status, session) = send(&app, Method::POST, "/api/sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(step_ids(&session), ["fabric", "sleeve", "collar", "cuff", "necktie", "bowtie", "measurements"]);
    assert_eq!(session["activeStep"], "fabric");
    // 0 base + 800 fabric + 300 collar - 100 cuff
    assert_eq!(session["price"]["total"], 1000);
    assert_eq!(session["preview"]["base"], "/f1-front.png");
    let overlays = session["preview"]["overlays"].as_array().unwrap();
    assert!(overlays.iter().any(|l| l["step"] == "collar" && l["image"] == "/c1-f1.png"));

    let id = session["id"].as_str().unwrap().to_string();
    let (status, session) = send(&app, Method::PUT, &format!("/api/sessions/{id}/step"), Some(json!({ "step": "cuff" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["activeStep"], "cuff");

    let (status, session) = send(&app, Method::PUT, &format!("/api/sessions/{id}/selections/sleeve"), Some(json!({ "optionId": "half" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!step_ids(&session).contains(&"cuff".to_string()));
    assert_eq!(session["activeStep"], "fabric");

    let (_, session) = send(&app, Method::PUT, &format!("/api/sessions/{id}/fabric"), Some(json!({ "fabricId": "f2" }))).await;
    assert_eq!(session["price"]["total"], 200);
    let (_, preview) = send(&app, Method::GET, &format!("/api/sessions/{id}/preview"), None).await;
    // no layer for f2, so the collar falls back to its flat image
    assert!(preview["overlays"].as_array().unwrap().iter().any(|l| l["image"] == "/c1.png"));
}

#[tokio::test]
async fn test_session_navigation_and_view() {
    let (_dir, app) = seeded().await;
    let (_, session) = send(&app, Method::POST, "/api/sessions", Some(json!({}))).await;
    let id = session["id"].as_str().unwrap().to_string();

    let (_, session) = send(&app, Method::POST, &format!("/api/sessions/{id}/previous"), None).await;
    assert_eq!(session["activeStep"], "fabric");
    let (_, session) = send(&app, Method::POST, &format!("/api/sessions/{id}/next"), None).await;
    assert_eq!(session["activeStep"], "sleeve");

    let (status, session) = send(&app, Method::PUT, &format!("/api/sessions/{id}/view"), Some(json!({ "view": "back" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["view"], "back");
    assert_eq!(session["preview"]["base"], "/f1-back.png");

    let (status, body) = send(&app, Method::PUT, &format!("/api/sessions/{id}/step"), Some(json!({ "step": "lining" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_session_selection_errors() {
    let (_dir, app) = seeded().await;
    let (_, session) = send(&app, Method::POST, "/api/sessions", Some(json!({}))).await;
    let id = session["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::PUT, &format!("/api/sessions/{id}/selections/collar"), Some(json!({ "optionId": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::PUT, &format!("/api/sessions/{id}/selections/collar"), Some(json!({ "optionId": null }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::PUT, &format!("/api/sessions/{id}/fabric"), Some(json!({ "fabricId": "f1", "color": "Mauve" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, Method::GET, &format!("/api/sessions/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Configurator session not found");
}

#[tokio::test]
async fn test_tie_exclusivity_over_http() {
    let (_dir, app) = seeded().await;
    let (_, session) = send(&app, Method::POST, "/api/sessions", Some(json!({}))).await;
    let id = session["id"].as_str().unwrap().to_string();
    assert!(session["configuration"]["selections"]["necktie"].is_null());

    let (_, session) = send(&app, Method::PUT, &format!("/api/sessions/{id}/selections/necktie"), Some(json!({ "optionId": "t1" }))).await;
    assert_eq!(session["configuration"]["selections"]["necktie"]["option"]["id"], "t1");
    assert!(session["configuration"]["selections"]["bowtie"].is_null());

    let (status, session) = send(&app, Method::PUT, &format!("/api/sessions/{id}/selections/necktie"), Some(json!({ "optionId": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["configuration"]["selections"]["necktie"]["kind"], "declined");
}

#[tokio::test]
async fn test_measurements() {
    let (_dir, app) = seeded().await;
    let (_, session) = send(&app, Method::POST, "/api/sessions", Some(json!({}))).await;
    let id = session["id"].as_str().unwrap().to_string();

    let (status, session) = send(&app, Method::PUT, &format!("/api/sessions/{id}/measurements"), Some(json!({ "neck": "15.5", "chest": "40" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["configuration"]["measurements"]["neck"], "15.5");

    // inseam does not apply to shirts; nothing from this batch is kept
    let (status, _) = send(&app, Method::PUT, &format!("/api/sessions/{id}/measurements"), Some(json!({ "waist": "32", "inseam": "30" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, session) = send(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
    assert!(session["configuration"]["measurements"]["waist"].is_null());
}

#[tokio::test]
async fn test_grouped_product_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let input = json!({
        "name": "Two-Piece Suit",
        "category": "suit",
        "basePrice": 30000,
        "fabrics": [{ "id": "w1", "name": "Worsted", "priceModifier": 5000 }],
        "customizationOptions": { "optionGroups": [
            { "id": "g2", "label": "Lining", "category": "lining", "order": 1,
              "options": [{ "id": "l1", "name": "Bemberg" }, { "id": "l2", "name": "Silk", "priceModifier": 1200, "isDefault": true }] },
            { "id": "g1", "label": "Collar", "category": "collar", "order": 0,
              "options": [{ "id": "notch", "name": "Notch" }] }
        ]}
    });
    let (status, product) = send(&app, Method::POST, "/api/products", Some(input)).await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = product["id"].as_str().unwrap().to_string();

    let (status, session) = send(&app, Method::POST, "/api/sessions", Some(json!({ "productId": product_id }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(step_ids(&session), ["fabric", "collar", "lining", "measurements"]);
    assert_eq!(session["price"]["total"], 36200);
    assert_eq!(session["configuration"]["selections"]["lining"]["option"]["id"], "l2");

    let (status, _) = send(&app, Method::POST, "/api/sessions", Some(json!({ "productId": uuid::Uuid::new_v4() }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_crud() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = send(&app, Method::POST, "/api/products", Some(json!({ "name": "", "category": "vest", "basePrice": 100 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
    let (status, _) = send(&app, Method::POST, "/api/products", Some(json!({ "name": "Vest", "category": "vest", "basePrice": -1 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, Method::POST, "/api/products", Some(json!({ "name": "Vest", "category": "vest", "basePrice": i64::MAX }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, body) = send(&app, Method::POST, "/api/products", Some(json!({
        "name": "Trousers", "category": "pants", "basePrice": 100,
        "customizationOptions": { "styles": { "fabric": [{ "id": "x", "name": "X" }] } }
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("reserved"));

    let (_, product) = send(&app, Method::POST, "/api/products", Some(json!({ "name": "Vest", "category": "vest", "basePrice": 9000 }))).await;
    let id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["isActive"], true);

    let (status, product) = send(&app, Method::PUT, &format!("/api/products/{id}"),
        Some(json!({ "name": "Waistcoat", "category": "vest", "basePrice": 9500, "isActive": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["name"], "Waistcoat");

    let (_, active) = send(&app, Method::GET, "/api/products", None).await;
    assert!(active.as_array().unwrap().is_empty());
    let (_, all) = send(&app, Method::GET, "/api/products?all=true", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fabric_crud_and_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, _) = send(&app, Method::POST, "/api/fabrics", Some(json!({ "name": "Satin", "colorMapUrl": "/satin.png", "roughness": 1.5 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, fabric) = send(&app, Method::POST, "/api/fabrics", Some(json!({ "name": "Satin", "colorMapUrl": "/satin.png" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(fabric["roughness"], 0.8);
    assert_eq!(fabric["metalness"], 0.0);
    let id = fabric["id"].as_str().unwrap().to_string();

    let (status, fabric) = send(&app, Method::PUT, &format!("/api/fabrics/{id}"),
        Some(json!({ "name": "Satin", "colorMapUrl": "/satin.png", "metalness": 0.3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fabric["metalness"], 0.3);

    let (_, list) = send(&app, Method::GET, "/api/fabrics", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/fabrics/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/fabrics/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_lifecycle() {
    let (_dir, app) = seeded().await;
    let (_, session) = send(&app, Method::POST, "/api/sessions", Some(json!({}))).await;
    let session_id = session["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::POST, "/api/orders", Some(json!({ "sessionId": session_id, "customerEmail": "not-an-email" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, Method::POST, "/api/orders", Some(json!({ "sessionId": uuid::Uuid::new_v4(), "customerEmail": "a@b.co" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, order) = send(&app, Method::POST, "/api/orders",
        Some(json!({ "sessionId": session_id, "customerEmail": "ada@example.com", "note": "rush" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["orderNumber"], 1001);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"], 1000);
    assert_eq!(order["currency"], "USD");
    let id = order["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::PUT, &format!("/api/orders/{id}/status"), Some(json!({ "status": "shipped" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, order) = send(&app, Method::PUT, &format!("/api/orders/{id}/status"), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "confirmed");

    let (_, fetched) = send(&app, Method::GET, &format!("/api/orders/{id}"), None).await;
    assert_eq!(fetched["status"], "confirmed");
    let (_, list) = send(&app, Method::GET, "/api/orders", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    // the session is consumed by the order
    let (status, _) = send(&app, Method::GET, &format!("/api/sessions/{session_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::POST, "/api/orders", Some(json!({ "sessionId": session_id, "customerEmail": "ada@example.com" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_and_serve() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let boundary = "tailorboundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"collar.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let uploaded: Value = serde_json::from_slice(&bytes).unwrap();
    let path = uploaded["path"].as_str().unwrap().to_string();
    assert!(path.starts_with("/uploads/") && path.ends_with(".png"));

    let response = app.clone().oneshot(Request::builder().uri(&path).body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&served[..], b"PNGDATA");
}

async fn upload(app: &Router, file_name: &str, content_type: &str, data: &str) -> StatusCode {
    let boundary = "tailorboundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    assert_eq!(upload(&app, "notes.txt", "text/plain", "hello").await, StatusCode::BAD_REQUEST);
    assert_eq!(
        upload(&app, "logo.svg", "image/svg+xml", "<svg xmlns=\"http://www.w3.org/2000/svg\"><script>alert(1)</script></svg>").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
