//! Post endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use common::{
    models::{NewPost, Post, PostUpdate},
    query::{PageFilter, PostFilter},
};
use tracing::{debug, info};

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    state::AppState,
};

/// List posts matching the filter
pub async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> Json<Vec<Post>> {
    debug!("Listing posts with {:?}", filter);
    Json(state.store.read().await.list_posts(&filter))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.store.read().await.get_post(&post_id)?))
}

pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.store.read().await.get_post_by_slug(&slug)?))
}

pub async fn list_posts_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(paging): Query<PageFilter>,
) -> ApiResult<Json<Vec<Post>>> {
    let store = state.store.read().await;
    store.get_category(&category_id)?;

    let base = PostFilter {
        category_id: Some(category_id),
        ..PostFilter::default()
    };
    Ok(Json(store.list_posts_where(base, &paging)))
}

pub async fn list_posts_by_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
    Query(paging): Query<PageFilter>,
) -> ApiResult<Json<Vec<Post>>> {
    let store = state.store.read().await;
    store.get_tag(&tag_id)?;

    let base = PostFilter {
        tag_id: Some(tag_id),
        ..PostFilter::default()
    };
    Ok(Json(store.list_posts_where(base, &paging)))
}

pub async fn list_posts_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(paging): Query<PageFilter>,
) -> ApiResult<Json<Vec<Post>>> {
    let store = state.store.read().await;
    store.find_user(&user_id).ok_or(ApiError::NotFound("User"))?;

    let base = PostFilter {
        author_id: Some(user_id),
        ..PostFilter::default()
    };
    Ok(Json(store.list_posts_where(base, &paging)))
}

/// Create a post authored by the caller
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<NewPost>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let post = state
        .store
        .write()
        .await
        .insert_post(&auth_user.0.user_id, payload)?;
    info!("User {} created post {}", auth_user.0.username, post.post_id);

    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post; only its author or a superuser may do so
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(post_id): Path<String>,
    Json(payload): Json<PostUpdate>,
) -> ApiResult<Json<Post>> {
    let mut store = state.store.write().await;
    if !auth_user.can_modify(&store.post_author(&post_id)?) {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(store.update_post(&post_id, payload)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    if !auth_user.can_modify(&store.post_author(&post_id)?) {
        return Err(ApiError::Forbidden);
    }

    store.delete_post(&post_id)?;
    info!("User {} deleted post {}", auth_user.0.username, post_id);

    Ok(StatusCode::NO_CONTENT)
}
