use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    Set,
};

use crate::{
    dto::orders::ContactPayload,
    entity::{
        contacts::{ActiveModel as ContactActive, Column as ContactCol, Entity as Contacts, Model as ContactModel},
        sea_orm_active_enums::ContactType,
    },
    error::{AppError, AppResult},
};

const MAX_VALUE_LEN: usize = 150;

/// Map a submit payload to a stored contact of `user_id`.
///
/// A given contact id must belong to the caller. Otherwise the address fields
/// are joined into one string and an identical address contact of the user is
/// reused, or created when none exists.
pub async fn resolve<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    payload: &ContactPayload,
) -> AppResult<ContactModel> {
    if let Some(contact_id) = payload.contact_id {
        return Contacts::find_by_id(contact_id)
            .filter(ContactCol::UserId.eq(user_id))
            .one(conn)
            .await?
            .ok_or_else(|| AppError::validation("contact", "unknown contact"));
    }

    let value = payload.address.to_address();
    if value.is_empty() {
        return Err(AppError::validation(
            "address",
            "provide a contact id or at least one address field",
        ));
    }
    if value.chars().count() > MAX_VALUE_LEN {
        return Err(AppError::validation(
            "address",
            format!("must be at most {MAX_VALUE_LEN} characters"),
        ));
    }

    find_or_create_address(conn, user_id, value).await
}

async fn find_or_create_address<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    value: String,
) -> AppResult<ContactModel> {
    let existing = Contacts::find()
        .filter(ContactCol::UserId.eq(user_id))
        .filter(ContactCol::ContactType.eq(ContactType::Address))
        .filter(ContactCol::Value.eq(value.as_str()))
        .one(conn)
        .await?;
    if let Some(contact) = existing {
        return Ok(contact);
    }

    let contact = ContactActive {
        id: NotSet,
        user_id: Set(user_id),
        contact_type: Set(ContactType::Address),
        value: Set(value),
    }
    .insert(conn)
    .await?;

    tracing::debug!(user_id, contact_id = contact.id, "address contact created");
    Ok(contact)
}
