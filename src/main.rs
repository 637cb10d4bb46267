mod config;
mod error;
mod handlers;
mod middleware;
mod migration;
mod models;
mod response;
mod routes;
mod services;
mod utils;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Auth routes
        crate::handlers::auth::google_login,
        crate::handlers::auth::logout,
        // Category routes
        crate::handlers::category::list_categories,
        // Post routes
        crate::handlers::post::list_posts,
        crate::handlers::post::search_posts,
        crate::handlers::post::get_post,
        crate::handlers::post::create_post,
        crate::handlers::post::update_post,
        crate::handlers::post::delete_post,
        // Comment routes
        crate::handlers::comment::list_comments,
        crate::handlers::comment::create_comment,
        crate::handlers::comment::update_comment,
        crate::handlers::comment::delete_comment,
        // Notice routes
        crate::handlers::notice::list_notices,
        crate::handlers::notice::get_notice,
        crate::handlers::notice::create_notice,
        crate::handlers::notice::update_notice,
        crate::handlers::notice::delete_notice,
        // Profile routes
        crate::handlers::user::get_profile,
        crate::handlers::user::update_profile,
    ),
    components(
        schemas(
            crate::error::AppError,
            crate::response::PaginationQuery,
            // Auth
            crate::handlers::auth::GoogleLoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::auth::SessionUser,
            // Category
            crate::handlers::category::CategoryResponse,
            // Post
            crate::handlers::post::PostListResponse,
            crate::handlers::post::PostListItem,
            crate::handlers::post::PostResponse,
            crate::handlers::post::PostDetailResponse,
            crate::handlers::post::CreatePostRequest,
            crate::handlers::post::UpdatePostRequest,
            // Comment
            crate::handlers::comment::CommentResponse,
            crate::handlers::comment::CommentThreadResponse,
            crate::handlers::comment::CreateCommentRequest,
            crate::handlers::comment::UpdateCommentRequest,
            // Notice
            crate::handlers::notice::NoticeResponse,
            crate::handlers::notice::NoticeListResponse,
            crate::handlers::notice::NoticeEnvelope,
            crate::handlers::notice::CreateNoticeRequest,
            crate::handlers::notice::UpdateNoticeRequest,
            // Profile
            crate::handlers::user::ProfileResponse,
            crate::handlers::user::UpdateProfileRequest,
            crate::handlers::user::UpdateProfileResponse,
        )
    ),
    tags(
        (name = "auth", description = "Google login and session management"),
        (name = "categories", description = "Board categories"),
        (name = "posts", description = "Post listing, search and management"),
        (name = "comments", description = "Comment threads"),
        (name = "notices", description = "Admin-authored announcements"),
        (name = "users", description = "User profile operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fanboard=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration before doing anything else
    let (jwt_config, google_config) = validate_config()?;

    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting fanboard API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::connect().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    services::bootstrap_admin::ensure_bootstrap_admin(&db).await?;

    let app = create_app()
        .layer(Extension(db))
        .layer(Extension(google_config));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<(config::jwt::JwtConfig, config::google::GoogleConfig)> {
    let jwt_config = config::jwt::JwtConfig::from_env()?;
    let google_config = config::google::GoogleConfig::from_env()?;

    // DATABASE_URL — checked here for early error; actual connection happens later
    if env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL environment variable must be set"
        ));
    }

    Ok((jwt_config, google_config))
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(
            middleware::security::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "fanboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
