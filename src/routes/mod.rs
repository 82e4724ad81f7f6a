use axum::{Json, Router, http::{StatusCode, Uri}, routing::get};

use crate::{response::ApiResponse, state::AppState};

pub mod auth;
pub mod basket;
pub mod catalog;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/user", auth::router())
        .nest("/basket", basket::router())
        .nest("/order", orders::router())
        .nest("/products", products::router())
        .merge(catalog::router())
}

/// Full application without the outer tower layers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::failure("Not Found", serde_json::json!({ "path": uri.path() }));
    (StatusCode::NOT_FOUND, Json(body))
}
