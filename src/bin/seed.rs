use order_confirm_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::user_directory::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&pool).await?;

    let buyer_id = ensure_active_user(&pool, "buyer@example.com", "buyer1234", "buyer").await?;
    let shop_user_id = ensure_active_user(&pool, "shop@example.com", "shop12345", "shop").await?;
    seed_products(&pool, shop_user_id).await?;

    println!("Seed completed. Buyer ID: {buyer_id}, Shop user ID: {shop_user_id}");
    Ok(())
}

// Seeded accounts skip email confirmation.
async fn ensure_active_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    user_type: &str,
) -> anyhow::Result<i64> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash, user_type, is_active)
        VALUES ($1, $2, $3, TRUE)
        ON CONFLICT (email) DO UPDATE SET is_active = TRUE
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(user_type)
    .fetch_one(pool)
    .await?;

    println!("Ensured {user_type} {email}");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool, shop_owner: i64) -> anyhow::Result<()> {
    let (shop_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO shops (name, url, user_id)
        VALUES ('Ferris Goods', 'https://ferris.example.com', $1)
        ON CONFLICT (user_id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(shop_owner)
    .fetch_one(pool)
    .await?;

    let merch = ensure_category(pool, "Merch").await?;
    let prints = ensure_category(pool, "Prints").await?;

    let products = [
        ("Ferris Plush", merch, 40, 1500_i64, 1800_i64),
        ("Borrow Checker Mug", merch, 120, 900, 1000),
        ("Lifetime Sticker Pack", prints, 500, 150, 200),
        ("Async Runtime Poster", prints, 60, 1200, 1500),
    ];

    for (name, category_id, quantity, price, price_rrc) in products {
        sqlx::query(
            r#"
            INSERT INTO product_infos (name, shop_id, category_id, quantity, price, price_rrc)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (SELECT 1 FROM product_infos WHERE name = $1 AND shop_id = $2)
            "#,
        )
        .bind(name)
        .bind(shop_id)
        .bind(category_id)
        .bind(quantity)
        .bind(price)
        .bind(price_rrc)
        .execute(pool)
        .await?;
    }

    println!("Seeded shop {shop_id} and its products");
    Ok(())
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<i64> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (i64,) = sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}
