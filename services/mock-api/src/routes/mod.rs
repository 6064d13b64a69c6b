//! Mock API routes
//!
//! Everything lives under `/api/v1`. Reads are public; every mutation and
//! `/auth/me` go through [`auth_middleware`].

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

mod auth;
mod categories;
mod comments;
mod posts;
mod tags;
mod users;

/// Create the router for the mock API
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/users", post(users::create_user))
        .route("/posts", get(posts::list_posts))
        .route("/posts/:id", get(posts::get_post))
        .route("/posts/slug/:slug", get(posts::get_post_by_slug))
        .route("/posts/category/:id", get(posts::list_posts_by_category))
        .route("/posts/tag/:id", get(posts::list_posts_by_tag))
        .route("/posts/user/:id", get(posts::list_posts_by_user))
        .route("/categories", get(categories::list_categories))
        .route("/categories/:id", get(categories::get_category))
        .route("/categories/slug/:slug", get(categories::get_category_by_slug))
        .route("/tags", get(tags::list_tags))
        .route("/tags/:id", get(tags::get_tag))
        .route("/tags/slug/:slug", get(tags::get_tag_by_slug))
        .route("/comments", get(comments::list_comments))
        .route("/comments/:id", get(comments::get_comment))
        .route("/comments/post/:id", get(comments::list_comments_by_post));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::current_user))
        .route("/posts", post(posts::create_post))
        .route(
            "/posts/:id",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route("/categories", post(categories::create_category))
        .route(
            "/categories/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/categories/:id/posts/:post_id",
            post(categories::add_post).delete(categories::remove_post),
        )
        .route("/tags", post(tags::create_tag))
        .route("/tags/:id", put(tags::update_tag).delete(tags::delete_tag))
        .route(
            "/tags/:id/posts/:post_id",
            post(tags::add_post).delete(tags::remove_post),
        )
        .route("/comments", post(comments::create_comment))
        .route(
            "/comments/:id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/comments/:id/like",
            post(comments::like_comment).delete(comments::unlike_comment),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", public_routes.merge(protected_routes))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mock-api"
    }))
}

/// Body returned by link/like endpoints
fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}
