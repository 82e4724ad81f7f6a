pub mod auth_service;
pub mod basket_service;
pub mod contact_service;
pub mod order_service;
pub mod product_service;
pub mod token_store;
pub mod user_directory;
