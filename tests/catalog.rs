use order_confirm_api::{
    dto::products::ProductList,
    entity::{
        categories::ActiveModel as CategoryActive,
        shops::ActiveModel as ShopActive,
    },
    response::ApiResponse,
    routes::params::{Pagination, ProductQuery},
    services::product_service,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use uuid::Uuid;

mod common;

use common::{create_listed_product, setup};

fn query(shop_id: Option<i64>, category_id: Option<i64>) -> ProductQuery {
    ProductQuery {
        page: Some(1),
        per_page: Some(100),
        q: None,
        shop_id,
        category_id,
    }
}

fn page_of(page: i64) -> Pagination {
    Pagination {
        page: Some(page),
        per_page: Some(100),
    }
}

fn ids(resp: ApiResponse<ProductList>) -> Vec<i64> {
    let mut ids: Vec<i64> = resp.data.expect("products").items.iter().map(|p| p.id).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn products_filter_by_shop_and_category() -> anyhow::Result<()> {
    let Some((state, _)) = setup().await? else {
        return Ok(());
    };
    let suffix = Uuid::new_v4().simple().to_string();

    let north = ShopActive {
        id: NotSet,
        name: Set(format!("North {}", &suffix[..8])),
        url: Set(None),
        user_id: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let south = ShopActive {
        id: NotSet,
        name: Set(format!("South {}", &suffix[..8])),
        url: Set(Some("https://south.example.com".into())),
        user_id: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let tools = CategoryActive {
        id: NotSet,
        name: Set(format!("Tools {}", &suffix[..8])),
    }
    .insert(&state.orm)
    .await?;

    let hammer = create_listed_product(&state.orm, 10, Some(north.id), Some(tools.id)).await?;
    let spoon = create_listed_product(&state.orm, 5, Some(north.id), None).await?;
    let saw = create_listed_product(&state.orm, 20, Some(south.id), Some(tools.id)).await?;

    let by_shop = ids(product_service::list_products(&state, query(Some(north.id), None)).await?);
    let mut expected = vec![hammer.id, spoon.id];
    expected.sort();
    assert_eq!(by_shop, expected);

    let by_category = ids(product_service::list_products(&state, query(None, Some(tools.id))).await?);
    let mut expected = vec![hammer.id, saw.id];
    expected.sort();
    assert_eq!(by_category, expected);

    let both = ids(product_service::list_products(&state, query(Some(south.id), Some(tools.id))).await?);
    assert_eq!(both, vec![saw.id]);
    Ok(())
}

#[tokio::test]
async fn shops_and_categories_are_listed() -> anyhow::Result<()> {
    let Some((state, _)) = setup().await? else {
        return Ok(());
    };
    let name = format!("Shop {}", Uuid::new_v4().simple());
    let shop = ShopActive {
        id: NotSet,
        name: Set(name[..20].to_string()),
        url: Set(None),
        user_id: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let category = CategoryActive {
        id: NotSet,
        name: Set(name[..20].to_string()),
    }
    .insert(&state.orm)
    .await?;

    // Other tests share the database, so walk the pages until the rows turn up.
    let mut found_shop = false;
    for page in 1.. {
        let resp = product_service::list_shops(&state, page_of(page)).await?;
        let items = resp.data.expect("shops").items;
        found_shop = items.iter().any(|s| s.id == shop.id && s.name == name[..20]);
        if found_shop || items.is_empty() {
            break;
        }
    }
    assert!(found_shop);

    let mut found_category = false;
    for page in 1.. {
        let resp = product_service::list_categories(&state, page_of(page)).await?;
        assert!(resp.meta.and_then(|m| m.total).unwrap_or_default() >= 1);
        let items = resp.data.expect("categories").items;
        found_category = items.iter().any(|c| c.id == category.id);
        if found_category || items.is_empty() {
            break;
        }
    }
    assert!(found_category);
    Ok(())
}
