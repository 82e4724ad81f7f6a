use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::{
    dto::products::ProductList,
    error::AppResult,
    models::ProductInfo,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Name contains, case-insensitive"),
        ("shop_id" = Option<i64>, Query, description = "Only products of this shop"),
        ("category_id" = Option<i64>, Query, description = "Only products in this category")
    ),
    responses(
        (status = 200, description = "List product infos", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let Query(query) = query?;
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product info ID")
    ),
    responses(
        (status = 200, description = "Get product info", body = ApiResponse<ProductInfo>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductInfo>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}
