//! HTTP 接口层测试
//!
//! 直接对完整 Router 发请求 (含鉴权提取器和错误映射), 验证状态码
//! 契约: 身份缺失 401, 角色不足 403, 资源缺失 404, 竞争冲突 409,
//! 规则拒绝 422, 入参非法 400。
//!
//! Run: cargo test -p mesa-server --test api_surface

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use mesa_server::db;
use mesa_server::db::models::{DiningTableCreate, MenuItemCreate};
use mesa_server::{Config, ServerState, api};

async fn test_app() -> (Router, ServerState) {
    let db = db::connect_memory().await.unwrap();
    let state = ServerState::new(Config::with_overrides("./unused", 0), db);
    (api::create_router(state.clone()), state)
}

/// Seed one table and one dish, return their record ids.
async fn seed(state: &ServerState, table_number: u32, price: f64) -> (String, String) {
    let table = state
        .tables
        .create(DiningTableCreate {
            table_number,
            capacity: Some(4),
        })
        .await
        .unwrap();
    let item = state
        .menu
        .create(MenuItemCreate {
            name: "Fried Rice".to_string(),
            price,
            is_available: None,
        })
        .await
        .unwrap();
    (table.id_string(), item.id_string())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn request(method: &str, uri: &str, actor: Option<(&str, &str)>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some((id, role)) = actor {
        builder = builder
            .header("x-actor-id", id)
            .header("x-actor-role", role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn place_body(table_id: &str, item_id: &str, quantity: u32) -> Value {
    json!({
        "table_id": table_id,
        "lines": [{ "menu_item_id": item_id, "quantity": quantity }],
    })
}

#[tokio::test]
async fn health_reports_healthy() {
    let (app, _state) = test_app().await;

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn placement_prices_the_order_and_occupies_the_table() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 5, 44.0).await;

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-1", "customer")),
            place_body(&table_id, &item_id, 2),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["payment_status"], "unpaid");
    assert_eq!(body["table_number"], 5);
    assert_eq!(body["total_amount"], 88.0);
    assert_eq!(body["lines"][0]["name"], "Fried Rice");
    assert_eq!(body["customer_id"], "cust-1");

    // 二维码入口看到的桌台已被占用
    let response = app.oneshot(get("/api/tables/by-number/5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "occupied");
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 2, 10.0).await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/orders",
            None,
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E3001");
}

#[tokio::test]
async fn unknown_role_is_a_bad_request() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 2, 10.0).await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("u-1", "manager")),
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn empty_lines_fail_validation() {
    let (app, state) = test_app().await;
    let (table_id, _item_id) = seed(&state, 2, 10.0).await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-1", "customer")),
            json!({ "table_id": table_id, "lines": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn second_party_cannot_take_an_occupied_table() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 8, 25.0).await;

    let first = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-1", "customer")),
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-2", "customer")),
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = read_json(second).await;
    assert_eq!(body["code"], "E0009");
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let (app, _state) = test_app().await;

    let response = app.oneshot(get("/api/orders/order:missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn customer_cannot_drive_the_lifecycle() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 3, 30.0).await;

    let placed = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-1", "customer")),
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    let order_id = read_json(placed).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(request(
            "POST",
            &format!("/api/orders/{}/transition", order_id),
            Some(("cust-1", "customer")),
            json!({ "target": "cancelled", "expected": "pending" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E2001");
}

#[tokio::test]
async fn unpaid_order_cannot_be_confirmed_over_http() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 4, 30.0).await;

    let placed = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-1", "customer")),
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    let order_id = read_json(placed).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(request(
            "POST",
            &format!("/api/orders/{}/transition", order_id),
            Some(("staff-1", "staff")),
            json!({ "target": "confirmed", "expected": "pending" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn payment_callback_settles_once() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 6, 52.0).await;

    let placed = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-1", "customer")),
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    let order_id = read_json(placed).await["id"].as_str().unwrap().to_string();

    // 网关回调不带操作者身份
    let first = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/payments/confirm",
            None,
            json!({ "order_id": order_id, "payment_ref": "pay_tx_1" }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let body = read_json(first).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["payment_status"], "paid");
    assert_eq!(body["payment_ref"], "pay_tx_1");

    // 网关重发: 幂等拒绝, 原支付引用不被覆盖
    let second = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/payments/confirm",
            None,
            json!({ "order_id": order_id, "payment_ref": "pay_tx_2" }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = read_json(second).await;
    assert_eq!(body["code"], "E0008");

    let stored = app
        .oneshot(get(&format!("/api/orders/{}", order_id)))
        .await
        .unwrap();
    let body = read_json(stored).await;
    assert_eq!(body["payment_ref"], "pay_tx_1");
}

#[tokio::test]
async fn claim_is_exclusive_and_handover_moves_it() {
    let (app, state) = test_app().await;
    let (table_id, item_id) = seed(&state, 7, 18.0).await;

    let placed = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/orders",
            Some(("cust-1", "customer")),
            place_body(&table_id, &item_id, 1),
        ))
        .await
        .unwrap();
    let order_id = read_json(placed).await["id"].as_str().unwrap().to_string();
    let claim_uri = format!("/api/orders/{}/claim", order_id);

    let won = app
        .clone()
        .oneshot(request("POST", &claim_uri, Some(("staff-1", "staff")), json!({})))
        .await
        .unwrap();
    assert_eq!(won.status(), StatusCode::OK);
    assert_eq!(read_json(won).await["staff_id"], "staff-1");

    let lost = app
        .clone()
        .oneshot(request("POST", &claim_uri, Some(("staff-2", "staff")), json!({})))
        .await
        .unwrap();
    assert_eq!(lost.status(), StatusCode::CONFLICT);
    assert_eq!(read_json(lost).await["code"], "E0007");

    let handed = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/orders/{}/reassign", order_id),
            Some(("admin-1", "admin")),
            json!({ "from": "staff-1", "to": "staff-2" }),
        ))
        .await
        .unwrap();
    assert_eq!(handed.status(), StatusCode::OK);
    assert_eq!(read_json(handed).await["staff_id"], "staff-2");
}

#[tokio::test]
async fn table_override_needs_staff_role() {
    let (app, state) = test_app().await;
    let (table_id, _item_id) = seed(&state, 9, 10.0).await;
    let uri = format!("/api/tables/{}/status", table_id);

    let denied = app
        .clone()
        .oneshot(request(
            "PUT",
            &uri,
            Some(("cust-1", "customer")),
            json!({ "status": "cleaning" }),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let allowed = app
        .clone()
        .oneshot(request(
            "PUT",
            &uri,
            Some(("staff-1", "staff")),
            json!({ "status": "cleaning" }),
        ))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(read_json(allowed).await["status"], "cleaning");

    let listed = app.oneshot(get("/api/tables")).await.unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    let body = read_json(listed).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_table_number_is_not_found() {
    let (app, _state) = test_app().await;

    let response = app.oneshot(get("/api/tables/by-number/99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_stream_opens_for_known_topics_only() {
    let (app, _state) = test_app().await;

    let bogus = app.clone().oneshot(get("/api/events/garbage")).await.unwrap();
    assert_eq!(bogus.status(), StatusCode::BAD_REQUEST);

    let stream = app.oneshot(get("/api/events/kitchen:all")).await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);
    assert_eq!(
        stream.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
}
