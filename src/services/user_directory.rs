//! Account storage: lookup, password verification and the active flag.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    Set, sea_query::Expr,
};

use crate::{
    entity::{
        sea_orm_active_enums::UserType,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub user_type: UserType,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn find<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<Option<UserModel>> {
    Ok(Users::find_by_id(user_id).one(conn).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> AppResult<Option<UserModel>> {
    let user = Users::find()
        .filter(UserCol::Email.eq(normalize_email(email)))
        .one(conn)
        .await?;
    Ok(user)
}

/// New accounts start inactive until their email is confirmed.
pub async fn create<C: ConnectionTrait>(conn: &C, user: NewUser) -> AppResult<UserModel> {
    let user = UserActive {
        id: NotSet,
        email: Set(normalize_email(&user.email)),
        password_hash: Set(user.password_hash),
        company: Set(user.company),
        position: Set(user.position),
        user_type: Set(user.user_type),
        is_active: Set(false),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(user)
}

/// The user for `email` when `password` matches, regardless of the active flag.
pub async fn authenticate<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    password: &str,
) -> AppResult<Option<UserModel>> {
    let Some(user) = find_by_email(conn, email).await? else {
        return Ok(None);
    };
    if verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

pub async fn is_active<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<bool> {
    let user = find(conn, user_id).await?.ok_or(AppError::NotFound)?;
    Ok(user.is_active)
}

pub async fn set_active<C: ConnectionTrait>(conn: &C, user_id: i64, active: bool) -> AppResult<()> {
    let result = Users::update_many()
        .col_expr(UserCol::IsActive, Expr::value(active))
        .filter(UserCol::Id.eq(user_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
