use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::{
    dto::products::{CategoryList, ShopList},
    error::AppResult,
    response::ApiResponse,
    routes::params::Pagination,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shops", get(list_shops))
        .route("/categories", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/shops",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List shops by name", body = ApiResponse<ShopList>)
    ),
    tag = "Catalog"
)]
pub async fn list_shops(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ShopList>>> {
    let Query(pagination) = query?;
    let resp = product_service::list_shops(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List categories by name", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let Query(pagination) = query?;
    let resp = product_service::list_categories(&state, pagination).await?;
    Ok(Json(resp))
}
