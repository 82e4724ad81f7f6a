//! Order lifecycle: `basket -> new -> confirmed`.
//!
//! Submitting binds a contact, moves the basket to `new` and issues an
//! order-scoped confirmation token. Confirming consumes that token and moves
//! the order to `confirmed` in the same transaction. The email carrying the
//! key goes out only after commit.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::LockType,
};

use crate::{
    audit,
    db::OrmConn,
    dto::{
        auth::ConfirmRequest,
        orders::{ContactPayload, OrderList, OrderQuery, SubmitOrderRequest, SubmittedOrder},
    },
    entity::{
        confirm_tokens::Model as TokenModel,
        contacts::{Column as ContactCol, Entity as Contacts},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_infos::Entity as ProductInfos,
        sea_orm_active_enums::OrderStatus,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Contact, Order, OrderItem},
    notify::{self, Notification},
    response::ApiResponse,
    services::{
        contact_service,
        token_store::{self, KeyGenerator, TokenPurpose},
        user_directory,
    },
    state::AppState,
};

/// What a committed submit hands back to the caller.
#[derive(Debug, Clone)]
pub struct Submission {
    pub order: OrderModel,
    pub token: TokenModel,
    pub token_created: bool,
    /// Address the confirmation key is mailed to.
    pub recipient: String,
}

/// Attach contact, line items and derived totals to each order, keeping order.
pub(crate) async fn with_details<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<Order>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for (item, product) in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Id)
        .find_also_related(ProductInfos)
        .all(conn)
        .await?
    {
        items_by_order
            .entry(item.order_id)
            .or_default()
            .push(OrderItem::from_entity(item, product));
    }

    let contact_ids: Vec<i64> = orders.iter().filter_map(|o| o.contact_id).collect();
    let contacts: HashMap<i64, Contact> = if contact_ids.is_empty() {
        HashMap::new()
    } else {
        Contacts::find()
            .filter(ContactCol::Id.is_in(contact_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|c| (c.id, Contact::from(c)))
            .collect()
    };

    Ok(orders
        .into_iter()
        .map(|order| {
            let contact = order.contact_id.and_then(|id| contacts.get(&id).cloned());
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            Order::assemble(order, contact, items)
        })
        .collect())
}

/// Non-basket orders of `user_id`, newest first, optionally narrowed to one id.
pub async fn find_orders<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    order_id: Option<i64>,
) -> AppResult<Vec<Order>> {
    let mut condition = Condition::all()
        .add(OrderCol::UserId.eq(user_id))
        .add(OrderCol::Status.ne(OrderStatus::Basket));
    if let Some(id) = order_id {
        condition = condition.add(OrderCol::Id.eq(id));
    }

    let orders = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt)
        .all(conn)
        .await?;
    with_details(conn, orders).await
}

/// Move the caller's basket to `new` with a resolved contact and issue its
/// confirmation token. Resubmitting an order still in `new` rebinds the
/// contact and returns the same unconsumed token.
pub async fn submit(
    orm: &OrmConn,
    keys: &dyn KeyGenerator,
    user_id: i64,
    basket_id: i64,
    contact: &ContactPayload,
) -> AppResult<Submission> {
    let txn = orm.begin().await?;

    let basket = Orders::find()
        .filter(OrderCol::Id.eq(basket_id))
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderCol::Status.is_in(OrderStatus::SUBMITTABLE))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let line_count = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(basket.id))
        .count(&txn)
        .await?;
    if line_count == 0 {
        return Err(AppError::validation("id", "basket is empty"));
    }

    let recipient = user_directory::find(&txn, user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?
        .email;

    let contact = contact_service::resolve(&txn, user_id, contact).await?;

    let mut active: OrderActive = basket.into();
    active.contact_id = Set(Some(contact.id));
    active.status = Set(OrderStatus::New);
    let order = active.update(&txn).await?;

    let issued = token_store::issue(&txn, keys, user_id, Some(order.id)).await?;

    txn.commit().await?;

    Ok(Submission {
        order,
        token: issued.token,
        token_created: issued.created,
        recipient,
    })
}

/// Consume an order token of `user_id` and confirm the order it names.
pub async fn confirm(orm: &OrmConn, user_id: i64, email: &str, key: &str) -> AppResult<Order> {
    let txn = orm.begin().await?;

    let token = token_store::consume(&txn, email, key, TokenPurpose::Order, Some(user_id))
        .await?
        .ok_or(AppError::InvalidToken)?;
    let order_id = token.order_id.ok_or(AppError::InvalidToken)?;

    let order = Orders::find_by_id(order_id)
        .filter(OrderCol::UserId.eq(user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if order.status == OrderStatus::New {
        let mut active: OrderActive = order.into();
        active.status = Set(OrderStatus::Confirmed);
        active.update(&txn).await?;
    }

    let confirmed = find_orders(&txn, user_id, Some(order_id))
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;

    txn.commit().await?;
    Ok(confirmed)
}

pub async fn submit_order(
    state: &AppState,
    user: &AuthUser,
    payload: SubmitOrderRequest,
) -> AppResult<ApiResponse<SubmittedOrder>> {
    let submission = submit(
        &state.orm,
        state.keys.as_ref(),
        user.user_id,
        payload.id,
        &payload.contact,
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        order_id = submission.order.id,
        token_reused = !submission.token_created,
        "order submitted"
    );

    notify::dispatch(
        state.notifier.clone(),
        Notification::order_confirmation(&submission.recipient, &submission.token.key),
    );

    audit::record(
        &state.orm,
        Some(user.user_id),
        "order_submitted",
        "orders",
        serde_json::json!({ "order_id": submission.order.id }),
    )
    .await;

    let contact_id = submission.order.contact_id.unwrap_or_default();
    Ok(ApiResponse::success(
        "Order submitted and awaiting confirmation. The confirmation key was sent by email",
        SubmittedOrder {
            order_id: submission.order.id,
            status: submission.order.status,
            contact_id,
        },
        None,
    ))
}

pub async fn confirm_order(
    state: &AppState,
    user: &AuthUser,
    payload: ConfirmRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;
    let order = confirm(&state.orm, user.user_id, &payload.email, &payload.token).await?;

    tracing::info!(user_id = user.user_id, order_id = order.id, "order confirmed");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "order_confirmed",
        "orders",
        serde_json::json!({ "order_id": order.id, "total_sum": order.total_sum }),
    )
    .await;

    Ok(ApiResponse::success("Order confirmed", order, None))
}

pub async fn get_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let items = find_orders(&state.orm, user.user_id, query.order_id).await?;
    Ok(ApiResponse::success("OK", OrderList { items }, None))
}
