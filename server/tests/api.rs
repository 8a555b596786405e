//! HTTP contract tests driving the full router against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use cupid_server::app_state::AppState;
use cupid_server::config::AppConfig;
use cupid_server::models::IdentityProfile;
use cupid_server::routes::build_router;
use cupid_server::services::{
    sign_payment, GatewayError, GatewayOrder, GatewayOrderRequest, IdentityError,
    IdentityProvider, PaymentGateway,
};
use cupid_server::store::{MemoryStore, Store};

const SECRET: &str = "rzp_test_secret";

/// Accepts session ids of the form `good-<name>`.
struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn session_data(&self, session_id: &str) -> Result<IdentityProfile, IdentityError> {
        let name = session_id
            .strip_prefix("good-")
            .ok_or(IdentityError::Rejected(401))?;
        Ok(IdentityProfile {
            email: format!("{name}@example.com"),
            name: name.to_string(),
            picture: Some(format!("https://img.example/{name}.png")),
            session_token: format!("tok-{name}"),
        })
    }
}

struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(&self, order: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        Ok(GatewayOrder {
            id: format!("order_{}", order.receipt),
            amount: order.amount,
            currency: order.currency.clone(),
        })
    }
}

fn app() -> (Router, Arc<MemoryStore>) {
    let mut config = AppConfig::local();
    config.razorpay.key_id = "rzp_test_key".to_string();
    config.razorpay.key_secret = SECRET.to_string();

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store.clone(), Arc::new(FakeIdentity), Arc::new(FakeGateway));
    (build_router(state), store)
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
    text: String,
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&bytes).to_string();
    Reply {
        status,
        headers,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        text,
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session_token={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session_token={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn sign_in(app: &Router, name: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/session")
        .header("X-Session-ID", format!("good-{name}"))
        .body(Body::empty())
        .unwrap();
    let reply = send(app, request).await;
    assert_eq!(reply.status, StatusCode::OK);
    format!("tok-{name}")
}

async fn draft(app: &Router, token: &str) -> String {
    let reply = send(
        app,
        post(
            "/api/valentines",
            Some(token),
            json!({
                "from_name": "Sam",
                "to_name": "Kit",
                "message": "Be mine?",
                "template_id": "guilt_trip",
            }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.body["valentine_id"].as_str().unwrap().to_string()
}

async fn pay(app: &Router, token: &str, valentine_id: &str) {
    let order = send(
        app,
        post(
            "/api/payment/create-order",
            Some(token),
            json!({ "valentine_id": valentine_id, "amount": 2.99, "currency": "USD", "bundle_type": "single" }),
        ),
    )
    .await;
    assert_eq!(order.status, StatusCode::OK);
    let order_id = order.body["order_id"].as_str().unwrap().to_string();

    let verified = send(
        app,
        post(
            "/api/payment/verify",
            Some(token),
            json!({
                "razorpay_order_id": order_id,
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": sign_payment(SECRET, &order_id, "pay_1").unwrap(),
                "valentine_id": valentine_id,
            }),
        ),
    )
    .await;
    assert_eq!(verified.status, StatusCode::OK);
}

#[tokio::test]
async fn health_and_banner_respond() {
    let (app, _) = app();
    assert_eq!(send(&app, get("/health", None)).await.text, "OK");
    assert_eq!(send(&app, get("/", None)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn session_exchange_sets_a_week_long_cookie() {
    let (app, _) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/session")
        .header("X-Session-ID", "good-ann")
        .body(Body::empty())
        .unwrap();
    let reply = send(&app, request).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["email"], "ann@example.com");
    let cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session_token=tok-ann;"));
    assert!(cookie.contains("Max-Age=604800"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn session_exchange_requires_a_valid_session_id() {
    let (app, _) = app();

    let missing = Request::builder()
        .method("POST")
        .uri("/api/auth/session")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, missing).await.status, StatusCode::BAD_REQUEST);

    let rejected = Request::builder()
        .method("POST")
        .uri("/api/auth/session")
        .header("X-Session-ID", "forged")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, rejected).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_needs_a_session_and_accepts_bearer_tokens() {
    let (app, _) = app();
    assert_eq!(
        send(&app, get("/api/auth/me", None)).await.status,
        StatusCode::UNAUTHORIZED
    );

    let token = sign_in(&app, "ann").await;
    let bearer = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let reply = send(&app, bearer).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "ann");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let (app, _) = app();
    let token = sign_in(&app, "ann").await;

    let reply = send(&app, post("/api/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(reply.body["message"], "Logged out");
    assert!(reply.headers[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    assert_eq!(
        send(&app, get("/api/auth/me", Some(&token))).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn templates_are_listed_without_a_session() {
    let (app, _) = app();
    let reply = send(&app, get("/api/templates", None)).await;

    let ids: Vec<&str> = reply
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["template_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        ["runaway_no", "emotional_damage", "guilt_trip", "puppy_eyes", "destiny_mode"]
    );
}

#[tokio::test]
async fn creating_valentines_validates_and_defaults() {
    let (app, _) = app();
    let token = sign_in(&app, "ann").await;

    let blank = send(
        &app,
        post(
            "/api/valentines",
            Some(&token),
            json!({ "from_name": "Sam", "to_name": "", "message": "hi", "template_id": "guilt_trip" }),
        ),
    )
    .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let unknown = send(
        &app,
        post(
            "/api/valentines",
            Some(&token),
            json!({ "from_name": "Sam", "to_name": "Kit", "message": "hi", "template_id": "mystery" }),
        ),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let anonymous = send(
        &app,
        post(
            "/api/valentines",
            None,
            json!({ "from_name": "Sam", "to_name": "Kit", "message": "hi", "template_id": "guilt_trip" }),
        ),
    )
    .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let id = draft(&app, &token).await;
    assert!(id.starts_with("val_"));

    let listed = send(&app, get("/api/valentines", Some(&token))).await;
    let records = listed.body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["payment_status"], "pending");
    assert_eq!(records[0]["emoji_style"], "cute");
    assert_eq!(records[0]["background_theme"], "pink");
}

#[tokio::test]
async fn pending_valentines_are_hidden_from_the_public() {
    let (app, _) = app();
    let token = sign_in(&app, "ann").await;
    let id = draft(&app, &token).await;
    let uri = format!("/api/valentines/{id}");

    assert_eq!(send(&app, get(&uri, None)).await.status, StatusCode::NOT_FOUND);

    let other = sign_in(&app, "bob").await;
    assert_eq!(
        send(&app, get(&uri, Some(&other))).await.status,
        StatusCode::NOT_FOUND
    );

    assert_eq!(send(&app, get(&uri, Some(&token))).await.status, StatusCode::OK);
}

#[tokio::test]
async fn pricing_follows_the_timezone() {
    let (app, _) = app();

    let india = send(
        &app,
        post("/api/payment/pricing", None, json!({ "timezone": "Asia/Kolkata" })),
    )
    .await;
    assert_eq!(india.body["currency"], "INR");
    assert_eq!(india.body["prices"]["bundle_3"], 24.99);

    let garbage = Request::builder()
        .method("POST")
        .uri("/api/payment/pricing")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let fallback = send(&app, garbage).await;
    assert_eq!(fallback.status, StatusCode::OK);
    assert_eq!(fallback.body["timezone"], "UTC");
    assert_eq!(fallback.body["currency"], "USD");
    assert_eq!(fallback.body["symbol"], "$");
}

#[tokio::test]
async fn orders_are_priced_server_side_and_owner_only() {
    let (app, _) = app();
    let token = sign_in(&app, "ann").await;
    let id = draft(&app, &token).await;

    let order = send(
        &app,
        post(
            "/api/payment/create-order",
            Some(&token),
            json!({ "valentine_id": id, "amount": 0.01, "currency": "USD", "bundle_type": "bundle_5" }),
        ),
    )
    .await;
    assert_eq!(order.status, StatusCode::OK);
    assert_eq!(order.body["amount"], 1049);
    assert_eq!(order.body["bundle_type"], "bundle_5");
    assert_eq!(order.body["display_amount"], 10.49);

    let other = sign_in(&app, "bob").await;
    let stolen = send(
        &app,
        post(
            "/api/payment/create-order",
            Some(&other),
            json!({ "valentine_id": id, "bundle_type": "single" }),
        ),
    )
    .await;
    assert_eq!(stolen.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_signatures_leave_the_valentine_pending() {
    let (app, store) = app();
    let token = sign_in(&app, "ann").await;
    let id = draft(&app, &token).await;

    let order = send(
        &app,
        post(
            "/api/payment/create-order",
            Some(&token),
            json!({ "valentine_id": id, "bundle_type": "single" }),
        ),
    )
    .await;
    let order_id = order.body["order_id"].as_str().unwrap();

    let reply = send(
        &app,
        post(
            "/api/payment/verify",
            Some(&token),
            json!({
                "order_id": order_id,
                "payment_id": "pay_1",
                "signature": sign_payment("not-the-secret", order_id, "pay_1").unwrap(),
                "valentine_id": id,
            }),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["detail"], "Invalid payment signature");

    let stored = store.get_valentine(&id).await.unwrap().unwrap();
    assert!(!stored.is_paid());
}

#[tokio::test]
async fn paid_valentines_accept_one_response() {
    let (app, _) = app();
    let token = sign_in(&app, "ann").await;
    let id = draft(&app, &token).await;
    pay(&app, &token, &id).await;

    let public = send(&app, get(&format!("/api/valentines/{id}"), None)).await;
    assert_eq!(public.status, StatusCode::OK);
    assert_eq!(public.body["payment_status"], "completed");
    assert_eq!(public.body["payment_id"], "pay_1");

    let uri = format!("/api/valentines/{id}/response");
    let refused = send(&app, post(&uri, None, json!({ "response": "no" }))).await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);

    let first = send(&app, post(&uri, None, json!({ "response": "yes" }))).await;
    assert_eq!(first.body["message"], "Response recorded");
    let second = send(&app, post(&uri, None, json!({ "response": "yes" }))).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["message"], "Response already recorded");

    let answered = send(&app, get(&format!("/api/valentines/{id}"), None)).await;
    assert_eq!(answered.body["response"], "yes");
}

#[tokio::test]
async fn the_demo_valentine_is_public() {
    let (app, _) = app();
    let demo = send(&app, get("/api/valentines/demo", None)).await;
    assert_eq!(demo.status, StatusCode::OK);
    assert_eq!(demo.body["template_id"], "runaway_no");
    assert_eq!(demo.body["from_name"], "Alex");

    let ack = send(
        &app,
        post("/api/valentines/demo/response", None, json!({ "response": "yes" })),
    )
    .await;
    assert_eq!(ack.status, StatusCode::OK);
}
