//! End-to-end flow over the HTTP surface: login, catalog management,
//! public storefront browsing, checkout and order cancellation.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use store_server::api;
use store_server::{Config, ServerState};

async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_str().unwrap(), 0);
    let state = ServerState::initialize(config).await.unwrap();
    (api::build_app(state), dir)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "admin", "password": "admin123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_store_flow() {
    let (app, _dir) = test_app().await;

    // Health is public
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // Admin surface is closed without a token
    let (status, _) = send(&app, Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;

    // Build catalog: sized category, one discounted product
    let (status, category) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(&token),
        Some(json!({"name": "Camisas", "slug": "camisas", "has_sizes": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "category create failed: {category}");
    let category_id = category["id"].as_i64().unwrap();

    let (status, product) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token),
        Some(json!({
            "name": "Camisa Titular 2026",
            "category_id": category_id,
            "cost_price": 80.0,
            "sale_price": 200.0,
            "is_discounted": true,
            "discount_percentage": 20.0,
            "images": [{"url": "https://cdn.example.com/camisa.jpg", "is_main": true}],
            "stock": {"M": 5, "G": 2}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "product create failed: {product}");
    let product_id = product["id"].as_i64().unwrap();
    assert_eq!(product["price"], 160.0);
    assert_eq!(product["old_price"], 200.0);

    // Storefront sees the product without auth and without cost data
    let (status, catalog) = send(&app, Method::GET, "/api/catalog", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = catalog
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"].as_i64() == Some(product_id))
        .expect("product missing from catalog");
    assert!(listed.get("cost_price").is_none());
    assert_eq!(listed["stock"]["M"], 5);

    // Checkout reserves stock
    let (status, order) = send(
        &app,
        Method::POST,
        "/api/checkout",
        None,
        Some(json!({
            "customer_name": "Maria Silva",
            "customer_phone": "11988887777",
            "items": [{
                "product_id": product_id,
                "product_name": "Camisa Titular 2026",
                "size": "M",
                "unit_price": 160.0,
                "quantity": 3
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "checkout failed: {order}");
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], 480.0);
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD-"));

    let (_, detail) = send(
        &app,
        Method::GET,
        &format!("/api/catalog/{product_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(detail["stock"]["M"], 2);

    // Over-asking is refused outright
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout",
        None,
        Some(json!({
            "customer_name": "João Souza",
            "customer_phone": "21977776666",
            "items": [{
                "product_id": product_id,
                "product_name": "Camisa Titular 2026",
                "size": "G",
                "unit_price": 160.0,
                "quantity": 3
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");

    // Cancellation restocks
    let (status, cancelled) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{order_id}/status"),
        Some(&token),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "cancel failed: {cancelled}");
    assert_eq!(cancelled["status"], "cancelled");

    let (_, detail) = send(
        &app,
        Method::GET,
        &format!("/api/catalog/{product_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(detail["stock"]["M"], 5);

    // Terminal orders stay terminal
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{order_id}/status"),
        Some(&token),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "unexpected: {body}");
}
