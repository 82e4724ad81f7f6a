use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};

use crate::{
    dto::{
        auth::ConfirmRequest,
        orders::{OrderList, OrderQuery, SubmitOrderRequest, SubmittedOrder},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(submit_order))
        .route("/confirm", post(confirm_order))
}

#[utoipa::path(
    get,
    path = "/api/order",
    params(
        ("order_id" = Option<i64>, Query, description = "Return only this order")
    ),
    responses(
        (status = 200, description = "Submitted orders of the caller with totals", body = ApiResponse<OrderList>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let Query(query) = query?;
    let resp = order_service::get_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/order",
    request_body = SubmitOrderRequest,
    responses(
        (status = 200, description = "Basket submitted, confirmation key emailed", body = ApiResponse<SubmittedOrder>),
        (status = 400, description = "Empty basket or missing contact"),
        (status = 404, description = "No submittable basket with that id"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn submit_order(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<SubmittedOrder>>> {
    let Json(payload) = payload?;
    let resp = order_service::submit_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/order/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Order confirmed", body = ApiResponse<Order>),
        (status = 400, description = "Incorrect email or token"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn confirm_order(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let Json(payload) = payload?;
    let resp = order_service::confirm_order(&state, &user, payload).await?;
    Ok(Json(resp))
}
