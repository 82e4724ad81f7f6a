#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use order_confirm_api::{
    config::AppConfig,
    db::{OrmConn, create_pool, orm_from_pool, run_migrations},
    entity::{
        product_infos::{ActiveModel as ProductActive, Model as ProductModel},
        sea_orm_active_enums::UserType,
        users::Model as UserModel,
    },
    notify::{Notifier, NotifyError},
    services::{
        token_store::RandomKeyGenerator,
        user_directory::{self, NewUser},
    },
    state::AppState,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use uuid::Uuid;

// Every test creates its own users and products, so runs against a shared
// database do not interfere and no truncation is needed.

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn last_to(&self, address: &str) -> Option<(String, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(_, _, to)| to == address)
            .map(|(subject, body, _)| (subject.clone(), body.clone()))
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, subject: &str, body: &str, address: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.into(), body.into(), address.into()));
        Ok(())
    }
}

pub async fn setup() -> anyhow::Result<Option<(AppState, Arc<RecordingNotifier>)>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;

    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState {
        orm: orm_from_pool(pool),
        config: Arc::new(AppConfig {
            database_url,
            host: "127.0.0.1".into(),
            port: 0,
            db_max_connections: 5,
            jwt_secret: "flow-test-secret".into(),
            jwt_ttl_hours: 1,
            smtp: None,
        }),
        notifier: notifier.clone(),
        keys: Arc::new(RandomKeyGenerator),
    };
    Ok(Some((state, notifier)))
}

pub async fn create_user(orm: &OrmConn, active: bool) -> anyhow::Result<UserModel> {
    let user = user_directory::create(
        orm,
        NewUser {
            email: format!("buyer-{}@example.com", Uuid::new_v4().simple()),
            password_hash: user_directory::hash_password("password123")?,
            company: None,
            position: None,
            user_type: UserType::Buyer,
        },
    )
    .await?;
    if active {
        user_directory::set_active(orm, user.id, true).await?;
    }
    Ok(user)
}

pub async fn create_product(orm: &OrmConn, price: i64) -> anyhow::Result<ProductModel> {
    create_listed_product(orm, price, None, None).await
}

pub async fn create_listed_product(
    orm: &OrmConn,
    price: i64,
    shop_id: Option<i64>,
    category_id: Option<i64>,
) -> anyhow::Result<ProductModel> {
    let product = ProductActive {
        id: NotSet,
        name: Set(format!("Widget {}", Uuid::new_v4().simple())),
        shop_id: Set(shop_id),
        category_id: Set(category_id),
        quantity: Set(100),
        price: Set(price),
        price_rrc: Set(price),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;
    Ok(product)
}
