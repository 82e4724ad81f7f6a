use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AccountConfirmed, ConfirmRequest, LoginRequest, LoginResponse, RegisterRequest},
        basket::{
            AddItemsRequest, AddItemsResult, ItemFailure, NewItem, RemoveItemsRequest,
            RemoveItemsResult, UpdateItemsRequest, UpdateItemsResult,
        },
        orders::{AddressFields, OrderList, SubmitOrderRequest, SubmittedOrder},
        products::{CategoryList, ProductList, ShopList},
    },
    entity::sea_orm_active_enums::{ContactType, OrderStatus, UserType},
    models::{Category, Contact, Order, OrderItem, ProductInfo, Shop, User},
    response::{ApiResponse, Meta},
    routes::{auth, basket, catalog, health, orders, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::confirm,
        auth::login,
        basket::basket_list,
        basket::add_items,
        basket::update_items,
        basket::remove_items,
        orders::list_orders,
        orders::submit_order,
        orders::confirm_order,
        products::list_products,
        products::get_product,
        catalog::list_shops,
        catalog::list_categories
    ),
    components(
        schemas(
            User,
            ProductInfo,
            Contact,
            Order,
            OrderItem,
            OrderStatus,
            ContactType,
            UserType,
            RegisterRequest,
            ConfirmRequest,
            LoginRequest,
            LoginResponse,
            AccountConfirmed,
            NewItem,
            AddItemsRequest,
            AddItemsResult,
            ItemFailure,
            RemoveItemsRequest,
            RemoveItemsResult,
            UpdateItemsRequest,
            UpdateItemsResult,
            AddressFields,
            SubmitOrderRequest,
            SubmittedOrder,
            OrderList,
            ProductList,
            Shop,
            ShopList,
            Category,
            CategoryList,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<ProductList>,
            ApiResponse<ShopList>,
            ApiResponse<CategoryList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, email confirmation and login"),
        (name = "Basket", description = "The caller's mutable basket"),
        (name = "Orders", description = "Order submission and confirmation"),
        (name = "Products", description = "Read-only product catalog"),
        (name = "Catalog", description = "Read-only shops and categories"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
