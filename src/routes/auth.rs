use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};

use crate::{
    dto::auth::{AccountConfirmed, ConfirmRequest, LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    models::User,
    response::ApiResponse,
    services::auth_service::{confirm_account, login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/confirm", post(confirm))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register an inactive account and email its confirmation key", body = ApiResponse<User>),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "Email registered concurrently")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<User>>> {
    let Json(payload) = payload?;
    let resp = register_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Activate the account", body = ApiResponse<AccountConfirmed>),
        (status = 400, description = "Incorrect email or token")
    ),
    tag = "Auth"
)]
pub async fn confirm(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<AccountConfirmed>>> {
    let Json(payload) = payload?;
    let resp = confirm_account(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 403, description = "Invalid credentials or unconfirmed email")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let Json(payload) = payload?;
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}
