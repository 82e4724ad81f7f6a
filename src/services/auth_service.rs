use sea_orm::TransactionTrait;

use crate::{
    audit,
    dto::auth::{AccountConfirmed, ConfirmRequest, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::issue_jwt,
    models::User,
    notify::{self, Notification},
    response::{ApiResponse, Meta},
    services::{
        token_store::{self, TokenPurpose},
        user_directory::{self, NewUser},
    },
    state::AppState,
};

/// Create an inactive account and mail its confirmation key.
pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    payload.validate()?;
    let RegisterRequest {
        email,
        password,
        company,
        position,
        user_type,
    } = payload;

    let txn = state.orm.begin().await?;

    if user_directory::find_by_email(&txn, &email).await?.is_some() {
        return Err(AppError::validation("email", "is already registered"));
    }

    let password_hash = user_directory::hash_password(&password)?;
    let user = user_directory::create(
        &txn,
        NewUser {
            email,
            password_hash,
            company,
            position,
            user_type,
        },
    )
    .await?;

    let issued = token_store::issue(&txn, state.keys.as_ref(), user.id, None).await?;

    txn.commit().await?;

    tracing::info!(user_id = user.id, "account registered");
    notify::dispatch(
        state.notifier.clone(),
        Notification::account_confirmation(&user.email, &issued.token.key),
    );

    audit::record(
        &state.orm,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Registered. A confirmation key was sent by email",
        User::from(user),
        Some(Meta::empty()),
    ))
}

/// Consume the account token and activate its user in one transaction.
pub async fn confirm_account(
    state: &AppState,
    payload: ConfirmRequest,
) -> AppResult<ApiResponse<AccountConfirmed>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let token = token_store::consume(
        &txn,
        &payload.email,
        &payload.token,
        TokenPurpose::Account,
        None,
    )
    .await?
    .ok_or(AppError::InvalidToken)?;

    user_directory::set_active(&txn, token.user_id, true).await?;
    txn.commit().await?;

    tracing::info!(user_id = token.user_id, "account confirmed");
    audit::record(
        &state.orm,
        Some(token.user_id),
        "account_confirmed",
        "users",
        serde_json::json!({ "user_id": token.user_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Account confirmed",
        AccountConfirmed {
            user_id: token.user_id,
            email: user_directory::normalize_email(&payload.email),
        },
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let user = user_directory::authenticate(&state.orm, &email, &password)
        .await?
        .filter(|user| user.is_active)
        .ok_or(AppError::Unauthorized)?;

    let token = issue_jwt(&state.config, user.id, &user.email)?;

    tracing::info!(user_id = user.id, "user logged in");
    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
        },
        Some(Meta::empty()),
    ))
}
