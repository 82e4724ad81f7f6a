use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use order_confirm_api::{
    config::AppConfig,
    middleware::auth::issue_jwt,
    notify::LogNotifier,
    routes::create_router,
    services::token_store::RandomKeyGenerator,
    state::AppState,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

// None of these requests reach the database.
fn test_state() -> AppState {
    AppState {
        orm: DatabaseConnection::Disconnected,
        config: Arc::new(test_config()),
        notifier: Arc::new(LogNotifier),
        keys: Arc::new(RandomKeyGenerator),
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        db_max_connections: 1,
        jwt_secret: "router-test-secret".into(),
        jwt_ttl_hours: 1,
        smtp: None,
    }
}

fn bearer() -> String {
    let token = issue_jwt(&test_config(), 7, "buyer@example.com").expect("jwt");
    format!("Bearer {token}")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_is_public_and_reports_database_state() {
    let response = create_router(test_state())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["status"], "degraded");
    assert_eq!(body["data"]["database"], false);
}

#[tokio::test]
async fn basket_requires_authentication() {
    let response = create_router(test_state())
        .oneshot(Request::get("/api/basket").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn malformed_bearer_token_is_rejected() {
    let response = create_router(test_state())
        .oneshot(
            Request::get("/api/order")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submit_with_malformed_json_is_a_bad_request() {
    let response = create_router(test_state())
        .oneshot(
            Request::post("/api/order")
                .header(header::AUTHORIZATION, bearer())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"id\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn confirm_order_rejects_blank_token_before_lookup() {
    let response = create_router(test_state())
        .oneshot(
            Request::post("/api/order/confirm")
                .header(header::AUTHORIZATION, bearer())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email": "buyer@example.com", "token": "  "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_validates_before_touching_storage() {
    let response = create_router(test_state())
        .oneshot(
            Request::post("/api/user/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email": "not-an-email", "password": "longenough"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["data"]["field"], "email");
}

#[tokio::test]
async fn unknown_path_falls_back_to_not_found() {
    let response = create_router(test_state())
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["data"]["path"], "/api/nope");
}

#[tokio::test]
async fn product_filters_reject_non_numeric_ids() {
    let response = create_router(test_state())
        .oneshot(
            Request::get("/api/products?shop_id=north")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["data"]["field"], "query");
}
