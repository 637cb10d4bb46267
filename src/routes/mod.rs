use crate::handlers;
use axum::{routing, Router};

pub fn create_routes() -> Router {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router {
    Router::new()
        // Auth
        .route("/auth/google", routing::post(handlers::auth::google_login))
        .route("/auth/logout", routing::post(handlers::auth::logout))
        // Categories
        .route(
            "/categories",
            routing::get(handlers::category::list_categories),
        )
        // Posts (the static /posts/search segment wins over /posts/{id})
        .route(
            "/posts",
            routing::get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route("/posts/search", routing::get(handlers::post::search_posts))
        .route(
            "/posts/{id}",
            routing::get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        // Comments
        .route(
            "/posts/{id}/comments",
            routing::get(handlers::comment::list_comments)
                .post(handlers::comment::create_comment),
        )
        .route(
            "/comments/{id}",
            routing::put(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
        // Notices (admin gate checked in the handlers)
        .route(
            "/notices",
            routing::get(handlers::notice::list_notices).post(handlers::notice::create_notice),
        )
        .route(
            "/notices/{id}",
            routing::get(handlers::notice::get_notice)
                .put(handlers::notice::update_notice)
                .delete(handlers::notice::delete_notice),
        )
        // Profile
        .route(
            "/user/profile",
            routing::get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
}
