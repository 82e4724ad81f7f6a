//! Read-only catalog views: product infos, shops and categories.

use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

use crate::{
    dto::products::{CategoryList, ProductList, ShopList},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        product_infos::{Column as ProdCol, Entity as ProductInfos},
        shops::{Column as ShopCol, Entity as Shops},
    },
    error::{AppError, AppResult},
    models::{Category, ProductInfo, Shop},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, ProductQuery},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = ProductInfos::find();
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q.to_lowercase());
        finder = finder.filter(Expr::expr(Func::lower(Expr::col(ProdCol::Name))).like(pattern));
    }
    if let Some(shop_id) = query.shop_id {
        finder = finder.filter(ProdCol::ShopId.eq(shop_id));
    }
    if let Some(category_id) = query.category_id {
        finder = finder.filter(ProdCol::CategoryId.eq(category_id));
    }
    let finder = finder.order_by_asc(ProdCol::Name).order_by_asc(ProdCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductInfo::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<ProductInfo>> {
    let product = ProductInfos::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", ProductInfo::from(product), None))
}

pub async fn list_shops(state: &AppState, pagination: Pagination) -> AppResult<ApiResponse<ShopList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Shops::find().order_by_asc(ShopCol::Name).order_by_asc(ShopCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Shop::from)
        .collect();

    Ok(ApiResponse::success("Shops", ShopList { items }, Some(Meta::new(page, limit, total))))
}

pub async fn list_categories(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<CategoryList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .order_by_asc(CategoryCol::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::new(page, limit, total)),
    ))
}
