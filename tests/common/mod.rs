#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseConnection, Statement,
};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);
static CATEGORY_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        if std::env::var("GOOGLE_CLIENT_ID").is_err() {
            std::env::set_var("GOOGLE_CLIENT_ID", "integration-test-client");
        }
        let config = fanboard::config::jwt::JwtConfig::from_env().unwrap();
        let _ = fanboard::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        fanboard::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    cleanup_tables(&db).await;

    let google_config =
        fanboard::config::google::GoogleConfig::from_env().expect("Google config from env");

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(fanboard::routes::create_routes())
        .layer(axum::middleware::from_fn(
            fanboard::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(google_config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    // Reverse dependency order; categories are reseeded per test as needed.
    let tables = ["comments", "posts", "notices", "categories", "users"];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Seed a user directly and mint a session token for it. Login normally
/// goes through Google; tests skip the exchange and sign their own JWTs.
pub async fn seed_user(db: &DatabaseConnection, name_prefix: &str) -> (i32, String) {
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let name = format!("{}_{}", name_prefix, counter);
    let now = chrono::Utc::now().naive_utc();

    let user = fanboard::models::user::ActiveModel {
        email: Set(format!("{}@test.com", name)),
        name: Set(name.clone()),
        nickname: Set(None),
        image: Set(None),
        role: Set(fanboard::models::UserRole::User),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed user");

    let token = fanboard::utils::jwt::encode_access_token(user.id, &user.name)
        .expect("Failed to mint token");
    (user.id, token)
}

/// Promote a user by writing the role column directly.
pub async fn make_admin(db: &DatabaseConnection, user_id: i32) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE users SET role = 'ADMIN' WHERE id = $1",
        vec![user_id.into()],
    ))
    .await
    .expect("Failed to promote user");
}

pub async fn seed_category(db: &DatabaseConnection, slug_prefix: &str) -> (i32, String) {
    let counter = CATEGORY_COUNTER.fetch_add(1, Ordering::SeqCst);
    let slug = format!("{}-{}", slug_prefix, counter);
    let now = chrono::Utc::now().naive_utc();

    let category = fanboard::models::category::ActiveModel {
        slug: Set(slug.clone()),
        name: Set(format!("게시판 {}", counter)),
        description: Set("테스트 게시판".to_string()),
        sort_order: Set(counter as i32),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed category");

    (category.id, slug)
}

/// Create a post through the API and return its id.
pub async fn create_test_post(
    app: &TestApp,
    token: &str,
    category_id: i32,
    title: &str,
    content: &str,
) -> i32 {
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": title,
            "content": content,
            "categoryId": category_id,
        }))
        .send()
        .await
        .expect("Failed to create post");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse post response");
    assert_eq!(status, 201, "create post failed: {}", body);

    body["id"].as_i64().expect("Response missing post id") as i32
}
