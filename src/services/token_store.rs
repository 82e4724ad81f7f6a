//! Single-use confirmation tokens.
//!
//! A token is scoped to `(user_id, order_id)` where `order_id = None` marks
//! an account confirmation. Issuing is lookup-or-create: an unconsumed
//! token for the same scope is handed back untouched, its key and creation
//! time are never rotated. Consuming deletes the row in the same statement
//! that matches it, so of two concurrent confirmations only one sees the row.

use rand::{Rng, distr::Alphanumeric};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbBackend, EntityTrait, QueryFilter, Statement,
};

use crate::{
    entity::confirm_tokens::{Column as TokenCol, Entity as ConfirmTokens, Model as TokenModel},
    error::{AppError, AppResult},
};

pub const KEY_LEN: usize = 64;
const MAX_KEY_ATTEMPTS: usize = 5;

/// Source of opaque token keys.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 64 alphanumeric characters from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_LEN)
            .map(char::from)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Account,
    Order,
}

impl TokenPurpose {
    fn clause(self) -> &'static str {
        match self {
            TokenPurpose::Account => "t.order_id IS NULL",
            TokenPurpose::Order => "t.order_id IS NOT NULL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: TokenModel,
    /// False when an existing unconsumed token was returned.
    pub created: bool,
}

pub async fn find<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    order_id: Option<i64>,
) -> AppResult<Option<TokenModel>> {
    let scope = match order_id {
        Some(id) => TokenCol::OrderId.eq(id),
        None => TokenCol::OrderId.is_null(),
    };
    let token = ConfirmTokens::find()
        .filter(
            Condition::all()
                .add(TokenCol::UserId.eq(user_id))
                .add(scope),
        )
        .one(conn)
        .await?;
    Ok(token)
}

pub async fn issue<C: ConnectionTrait>(
    conn: &C,
    keys: &dyn KeyGenerator,
    user_id: i64,
    order_id: Option<i64>,
) -> AppResult<IssuedToken> {
    if let Some(token) = find(conn, user_id, order_id).await? {
        return Ok(IssuedToken {
            token,
            created: false,
        });
    }

    for attempt in 1..=MAX_KEY_ATTEMPTS {
        let key = keys.generate();
        let inserted = ConfirmTokens::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"
                INSERT INTO confirm_tokens (user_id, key, order_id)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                RETURNING id, user_id, key, created_at, order_id
                "#,
                [user_id.into(), key.into(), order_id.into()],
            ))
            .one(conn)
            .await?;

        if let Some(token) = inserted {
            tracing::debug!(user_id, ?order_id, "confirmation token issued");
            return Ok(IssuedToken {
                token,
                created: true,
            });
        }

        // Either a concurrent issue for the same scope won, or the key collided.
        if let Some(token) = find(conn, user_id, order_id).await? {
            return Ok(IssuedToken {
                token,
                created: false,
            });
        }
        tracing::warn!(user_id, attempt, "confirmation key collision, regenerating");
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "could not generate a unique confirmation key"
    )))
}

/// Delete and return the token matching `email` and `key`. `owner`, when
/// given, must be the token's user. `None` covers every kind of mismatch.
pub async fn consume<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    key: &str,
    purpose: TokenPurpose,
    owner: Option<i64>,
) -> AppResult<Option<TokenModel>> {
    let sql = format!(
        r#"
        DELETE FROM confirm_tokens t
        USING users u
        WHERE u.id = t.user_id
          AND lower(u.email) = lower($1)
          AND t.key = $2
          AND ($3::BIGINT IS NULL OR t.user_id = $3)
          AND {}
        RETURNING t.id, t.user_id, t.key, t.created_at, t.order_id
        "#,
        purpose.clause()
    );

    let token = ConfirmTokens::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [email.trim().into(), key.trim().into(), owner.into()],
        ))
        .one(conn)
        .await?;

    match &token {
        Some(t) => tracing::debug!(user_id = t.user_id, order_id = ?t.order_id, "confirmation token consumed"),
        None => tracing::debug!(?purpose, "confirmation token rejected"),
    }
    Ok(token)
}
