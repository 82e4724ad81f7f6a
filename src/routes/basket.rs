use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};

use crate::{
    dto::{
        basket::{
            AddItemsRequest, AddItemsResult, RemoveItemsRequest, RemoveItemsResult,
            UpdateItemsRequest, UpdateItemsResult,
        },
        orders::OrderList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::basket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(basket_list)
            .post(add_items)
            .put(update_items)
            .delete(remove_items),
    )
}

#[utoipa::path(
    get,
    path = "/api/basket",
    responses(
        (status = 200, description = "Current basket with line items and total", body = ApiResponse<OrderList>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn basket_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = basket_service::get_basket(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/basket",
    request_body = AddItemsRequest,
    responses(
        (status = 200, description = "Add line items; failed lines are listed, created ones kept", body = ApiResponse<AddItemsResult>),
        (status = 400, description = "Malformed items"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn add_items(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<AddItemsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<AddItemsResult>>> {
    let Json(payload) = payload?;
    let resp = basket_service::add_to_basket(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/basket",
    request_body = UpdateItemsRequest,
    responses(
        (status = 200, description = "Update quantities; malformed entries are skipped", body = ApiResponse<UpdateItemsResult>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn update_items(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateItemsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<UpdateItemsResult>>> {
    let Json(payload) = payload?;
    let resp = basket_service::update_basket(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/basket",
    request_body = RemoveItemsRequest,
    responses(
        (status = 200, description = "Remove line items; unknown ids are ignored", body = ApiResponse<RemoveItemsResult>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn remove_items(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<RemoveItemsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<RemoveItemsResult>>> {
    let Json(payload) = payload?;
    let resp = basket_service::remove_from_basket(&state, &user, payload).await?;
    Ok(Json(resp))
}
