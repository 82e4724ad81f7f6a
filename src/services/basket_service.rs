//! The per-user basket: a single `basket`-status order and its line items.
//!
//! Line prices are snapshotted from the product info whenever a line is
//! written; later catalog price changes do not reach existing lines.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait, sea_query::LockType,
};

use crate::{
    audit,
    db::OrmConn,
    dto::basket::{
        AddItemsRequest, AddItemsResult, ItemFailure, NewItem, RemoveItemsRequest,
        RemoveItemsResult, UpdateItemsRequest, UpdateItemsResult,
    },
    dto::orders::OrderList,
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_infos::Entity as ProductInfos,
        sea_orm_active_enums::OrderStatus,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::order_service::with_details,
    state::AppState,
};

/// `(price, total_amount)` for a line of `quantity` units at `unit_price`.
pub fn line_amounts(unit_price: i64, quantity: i32) -> AppResult<(i64, i64)> {
    if quantity <= 0 {
        return Err(AppError::validation("quantity", "must be greater than 0"));
    }
    let total = unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| AppError::validation("quantity", "is too large"))?;
    Ok((unit_price, total))
}

pub async fn find_basket<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<Option<OrderModel>> {
    let basket = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderCol::Status.eq(OrderStatus::Basket))
        .one(conn)
        .await?;
    Ok(basket)
}

/// The caller's basket under `FOR UPDATE`. Writers and `submit` serialize
/// on this row; once a submit commits the row no longer matches and `None`
/// comes back.
pub async fn lock_basket<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<Option<OrderModel>> {
    let basket = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderCol::Status.eq(OrderStatus::Basket))
        .lock(LockType::Update)
        .one(conn)
        .await?;
    Ok(basket)
}

/// Locked basket for a write, created when missing. A basket submitted
/// between the lookup and the lock is skipped for a fresh one.
async fn lock_or_create_basket<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<OrderModel> {
    for _ in 0..2 {
        let basket = get_or_create_basket(conn, user_id).await?;
        match lock_basket(conn, user_id).await? {
            Some(locked) => return Ok(locked),
            None => tracing::debug!(user_id, order_id = basket.id, "basket submitted concurrently"),
        }
    }
    Err(AppError::Constraint("basket changed concurrently, retry".into()))
}

/// Idempotent: the partial unique index on `(user_id) WHERE status = 'basket'`
/// makes concurrent callers agree on one row.
pub async fn get_or_create_basket<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<OrderModel> {
    let created = Orders::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO orders (user_id, status)
            VALUES ($1, 'basket')
            ON CONFLICT (user_id) WHERE status = 'basket' DO NOTHING
            RETURNING id, user_id, contact_id, created_at, status
            "#,
            [user_id.into()],
        ))
        .one(conn)
        .await?;

    if let Some(basket) = created {
        tracing::debug!(user_id, order_id = basket.id, "basket created");
        return Ok(basket);
    }

    find_basket(conn, user_id)
        .await?
        .ok_or_else(|| AppError::Constraint("basket changed concurrently, retry".into()))
}

async fn insert_item<C: ConnectionTrait>(conn: &C, order_id: i64, item: &NewItem) -> AppResult<()> {
    if item.quantity <= 0 {
        return Err(AppError::validation("quantity", "must be greater than 0"));
    }
    let product = ProductInfos::find_by_id(item.product_info_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::validation("product_info_id", "product not found"))?;
    let (price, total_amount) = line_amounts(product.price, item.quantity)?;

    OrderItemActive {
        id: NotSet,
        order_id: Set(order_id),
        product_info_id: Set(product.id),
        quantity: Set(item.quantity),
        price: Set(price),
        total_amount: Set(total_amount),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Add lines to the caller's basket. A line for a product already in the
/// basket is a constraint violation, not a merge. Each line runs under its
/// own savepoint so a failing line leaves the others in place.
pub async fn add_items(orm: &OrmConn, user_id: i64, items: &[NewItem]) -> AppResult<AddItemsResult> {
    if items.is_empty() {
        return Err(AppError::validation("items", "must not be empty"));
    }

    let txn = orm.begin().await?;
    let basket = lock_or_create_basket(&txn, user_id).await?;
    let mut result = AddItemsResult::default();

    for (index, item) in items.iter().enumerate() {
        let savepoint = txn.begin().await?;
        match insert_item(&savepoint, basket.id, item).await {
            Ok(()) => {
                savepoint.commit().await?;
                result.created += 1;
            }
            Err(err @ (AppError::Validation { .. } | AppError::Constraint(_))) => {
                savepoint.rollback().await?;
                result.failures.push(ItemFailure {
                    index,
                    product_info_id: item.product_info_id,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    txn.commit().await?;
    Ok(result)
}

/// Delete lines by id from the caller's basket. Ids outside it are ignored.
pub async fn remove_items(orm: &OrmConn, user_id: i64, item_ids: &[i64]) -> AppResult<u64> {
    if item_ids.is_empty() {
        return Ok(0);
    }
    let txn = orm.begin().await?;
    let Some(basket) = lock_basket(&txn, user_id).await? else {
        return Ok(0);
    };

    let result = OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(basket.id))
        .filter(OrderItemCol::Id.is_in(item_ids.iter().copied()))
        .exec(&txn)
        .await?;
    txn.commit().await?;
    Ok(result.rows_affected)
}

/// Apply `(item id, quantity)` pairs to lines of the caller's basket,
/// re-deriving price and total. Entries whose total would overflow are
/// skipped. Returns how many lines changed.
pub async fn update_quantities(orm: &OrmConn, user_id: i64, updates: &[(i64, i32)]) -> AppResult<u64> {
    if updates.is_empty() {
        return Ok(0);
    }
    let txn = orm.begin().await?;
    let Some(basket) = lock_basket(&txn, user_id).await? else {
        return Ok(0);
    };

    let mut updated = 0;
    for &(item_id, quantity) in updates {
        let found = OrderItems::find_by_id(item_id)
            .filter(OrderItemCol::OrderId.eq(basket.id))
            .find_also_related(ProductInfos)
            .one(&txn)
            .await?;
        let Some((item, Some(product))) = found else {
            continue;
        };

        let Ok((price, total_amount)) = line_amounts(product.price, quantity) else {
            tracing::debug!(item_id, quantity, "quantity update skipped, line total overflows");
            continue;
        };
        let mut active: OrderItemActive = item.into();
        active.quantity = Set(quantity);
        active.price = Set(price);
        active.total_amount = Set(total_amount);
        active.update(&txn).await?;
        updated += 1;
    }

    txn.commit().await?;
    Ok(updated)
}

/// Read-only view of the caller's basket; empty when none exists yet.
pub async fn list_baskets<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<Vec<Order>> {
    let baskets = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderCol::Status.eq(OrderStatus::Basket))
        .order_by_desc(OrderCol::CreatedAt)
        .all(conn)
        .await?;
    with_details(conn, baskets).await
}

pub async fn get_basket(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderList>> {
    let items = list_baskets(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success("OK", OrderList { items }, None))
}

pub async fn add_to_basket(
    state: &AppState,
    user: &AuthUser,
    payload: AddItemsRequest,
) -> AppResult<ApiResponse<AddItemsResult>> {
    let result = add_items(&state.orm, user.user_id, &payload.items).await?;
    tracing::info!(
        user_id = user.user_id,
        created = result.created,
        failed = result.failures.len(),
        "basket items added"
    );

    audit::record(
        &state.orm,
        Some(user.user_id),
        "basket_add",
        "order_items",
        serde_json::json!({ "created": result.created, "failed": result.failures.len() }),
    )
    .await;

    let message = format!("Created items: {}", result.created);
    Ok(ApiResponse::success(message, result, None))
}

pub async fn remove_from_basket(
    state: &AppState,
    user: &AuthUser,
    payload: RemoveItemsRequest,
) -> AppResult<ApiResponse<RemoveItemsResult>> {
    if payload.items.is_empty() {
        return Err(AppError::validation("items", "must not be empty"));
    }
    let deleted = remove_items(&state.orm, user.user_id, &payload.items.ids()).await?;
    Ok(ApiResponse::success(
        format!("Deleted items: {deleted}"),
        RemoveItemsResult { deleted },
        None,
    ))
}

pub async fn update_basket(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateItemsRequest,
) -> AppResult<ApiResponse<UpdateItemsResult>> {
    if payload.items.is_empty() {
        return Err(AppError::validation("items", "must not be empty"));
    }
    let updates: Vec<(i64, i32)> = payload.items.iter().filter_map(|u| u.applicable()).collect();
    let updated = update_quantities(&state.orm, user.user_id, &updates).await?;
    Ok(ApiResponse::success(
        format!("Updated items: {updated}"),
        UpdateItemsResult { updated },
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_amounts_multiply_snapshot_price() {
        assert_eq!(line_amounts(100, 2).unwrap(), (100, 200));
        assert_eq!(line_amounts(0, 5).unwrap(), (0, 0));
    }

    #[test]
    fn line_amounts_reject_non_positive_quantity() {
        assert!(matches!(line_amounts(100, 0), Err(AppError::Validation { .. })));
        assert!(matches!(line_amounts(100, -3), Err(AppError::Validation { .. })));
    }

    #[test]
    fn line_amounts_reject_overflow() {
        assert!(line_amounts(i64::MAX, 2).is_err());
    }
}
