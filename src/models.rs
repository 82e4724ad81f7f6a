use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{
    categories::Model as CategoryModel,
    contacts::Model as ContactModel,
    order_items::Model as OrderItemModel,
    orders::Model as OrderModel,
    product_infos::Model as ProductInfoModel,
    sea_orm_active_enums::{ContactType, OrderStatus, UserType},
    shops::Model as ShopModel,
    users::Model as UserModel,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub user_type: UserType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            email: model.email,
            company: model.company,
            position: model.position,
            user_type: model.user_type,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductInfo {
    pub id: i64,
    pub name: String,
    pub shop_id: Option<i64>,
    pub category_id: Option<i64>,
    pub quantity: i32,
    pub price: i64,
    pub price_rrc: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ProductInfoModel> for ProductInfo {
    fn from(model: ProductInfoModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            shop_id: model.shop_id,
            category_id: model.category_id,
            quantity: model.quantity,
            price: model.price,
            price_rrc: model.price_rrc,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
}

impl From<ShopModel> for Shop {
    fn from(model: ShopModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            url: model.url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub value: String,
}

impl From<ContactModel> for Contact {
    fn from(model: ContactModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            contact_type: model.contact_type,
            value: model.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_info_id: i64,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub price: i64,
    pub total_amount: i64,
}

impl OrderItem {
    pub fn from_entity(model: OrderItemModel, product: Option<ProductInfoModel>) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_info_id: model.product_info_id,
            product_name: product.map(|p| p.name),
            quantity: model.quantity,
            price: model.price,
            total_amount: model.total_amount,
        }
    }
}

/// An order together with its contact, line items and the aggregates
/// derived from them. Totals are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub contact: Option<Contact>,
    pub items: Vec<OrderItem>,
    pub total_quantity: i64,
    pub total_sum: i64,
}

impl Order {
    pub fn assemble(model: OrderModel, contact: Option<Contact>, items: Vec<OrderItem>) -> Self {
        let total_quantity = items.iter().map(|i| i64::from(i.quantity)).sum();
        // Saturates instead of wrapping on absurd baskets.
        let total_sum = items.iter().fold(0_i64, |acc, i| {
            acc.saturating_add(i.price.saturating_mul(i64::from(i.quantity)))
        });
        Self {
            id: model.id,
            user_id: model.user_id,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            contact,
            items,
            total_quantity,
            total_sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, quantity: i32, price: i64) -> OrderItem {
        OrderItem {
            id,
            order_id: 10,
            product_info_id: id,
            product_name: None,
            quantity,
            price,
            total_amount: price * i64::from(quantity),
        }
    }

    #[test]
    fn assemble_derives_totals_from_items() {
        let model = OrderModel {
            id: 10,
            user_id: 1,
            contact_id: None,
            created_at: Utc::now().into(),
            status: OrderStatus::New,
        };
        let order = Order::assemble(model, None, vec![item(1, 2, 100), item(2, 3, 15)]);
        assert_eq!(order.total_quantity, 5);
        assert_eq!(order.total_sum, 245);
    }

    #[test]
    fn total_sum_saturates_instead_of_overflowing() {
        let model = OrderModel {
            id: 12,
            user_id: 1,
            contact_id: None,
            created_at: Utc::now().into(),
            status: OrderStatus::New,
        };
        let big = OrderItem {
            id: 1,
            order_id: 12,
            product_info_id: 1,
            product_name: None,
            quantity: 3,
            price: i64::MAX / 2,
            total_amount: i64::MAX,
        };
        let order = Order::assemble(model, None, vec![big, item(2, 1, 10)]);
        assert_eq!(order.total_sum, i64::MAX);
        assert_eq!(order.total_quantity, 4);
    }

    #[test]
    fn empty_order_has_zero_totals() {
        let model = OrderModel {
            id: 11,
            user_id: 1,
            contact_id: None,
            created_at: Utc::now().into(),
            status: OrderStatus::Basket,
        };
        let order = Order::assemble(model, None, Vec::new());
        assert_eq!((order.total_quantity, order.total_sum), (0, 0));
    }
}
