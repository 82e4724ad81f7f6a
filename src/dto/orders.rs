use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{entity::sea_orm_active_enums::OrderStatus, models::Order};

/// Free-text address parts, joined in declaration order.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct AddressFields {
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub housing: Option<String>,
    pub building: Option<String>,
    pub apartment: Option<String>,
}

impl AddressFields {
    /// Non-empty parts joined with `", "`.
    pub fn to_address(&self) -> String {
        [
            &self.city,
            &self.street,
            &self.house,
            &self.housing,
            &self.building,
            &self.apartment,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim).filter(|p| !p.is_empty()))
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Either a stored contact id or the address to resolve one from.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ContactPayload {
    #[serde(rename = "contact")]
    pub contact_id: Option<i64>,
    #[serde(flatten)]
    pub address: AddressFields,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitOrderRequest {
    /// Id of the basket order being submitted.
    pub id: i64,
    #[serde(flatten)]
    pub contact: ContactPayload,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmittedOrder {
    pub order_id: i64,
    pub status: OrderStatus,
    pub contact_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub order_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_skips_empty_parts_in_order() {
        let fields = AddressFields {
            city: Some("X".into()),
            street: Some("Y".into()),
            house: Some("".into()),
            apartment: Some("12".into()),
            ..Default::default()
        };
        assert_eq!(fields.to_address(), "X, Y, 12");
    }

    #[test]
    fn address_without_city_starts_at_first_present_part() {
        let fields = AddressFields {
            street: Some("Main".into()),
            building: Some(" 2 ".into()),
            ..Default::default()
        };
        assert_eq!(fields.to_address(), "Main, 2");
    }

    #[test]
    fn empty_fields_give_empty_address() {
        assert_eq!(AddressFields::default().to_address(), "");
    }

    #[test]
    fn submit_request_reads_flat_payload() {
        let req: SubmitOrderRequest =
            serde_json::from_str(r#"{"id":10,"city":"X","street":"Y"}"#).unwrap();
        assert_eq!(req.id, 10);
        assert_eq!(req.contact.contact_id, None);
        assert_eq!(req.contact.address.to_address(), "X, Y");

        let req: SubmitOrderRequest = serde_json::from_str(r#"{"id":10,"contact":4}"#).unwrap();
        assert_eq!(req.contact.contact_id, Some(4));
    }
}
