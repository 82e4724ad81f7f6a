pub mod audit_logs;
pub mod categories;
pub mod confirm_tokens;
pub mod contacts;
pub mod order_items;
pub mod orders;
pub mod product_infos;
pub mod sea_orm_active_enums;
pub mod shops;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use confirm_tokens::Entity as ConfirmTokens;
pub use contacts::Entity as Contacts;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_infos::Entity as ProductInfos;
pub use shops::Entity as Shops;
pub use users::Entity as Users;
