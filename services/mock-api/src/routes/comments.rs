//! Comment endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use common::{
    models::{Comment, CommentUpdate, NewComment},
    query::{CommentFilter, Pagination},
};
use serde_json::Value;
use tracing::info;

use super::message;
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    state::AppState,
};

fn require_content(content: &str) -> ApiResult<()> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest("content is required".to_string()));
    }
    Ok(())
}

pub async fn list_comments(
    State(state): State<AppState>,
    Query(filter): Query<CommentFilter>,
) -> Json<Vec<Comment>> {
    Json(state.store.read().await.list_comments(&filter))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(state.store.read().await.get_comment(&comment_id)?))
}

/// All comments on one post, newest first
pub async fn list_comments_by_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<Comment>>> {
    let store = state.store.read().await;
    store.get_post(&post_id)?;

    Ok(Json(store.list_comments(&CommentFilter {
        post_id: Some(post_id),
        skip: pagination.skip,
        limit: pagination.limit,
    })))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    require_content(&payload.content)?;

    let comment = state
        .store
        .write()
        .await
        .insert_comment(&auth_user.0.user_id, payload)?;
    info!(
        "User {} commented on post {}",
        auth_user.0.username, comment.post_id
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Edit a comment; only its author or a superuser may do so
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
    Json(payload): Json<CommentUpdate>,
) -> ApiResult<Json<Comment>> {
    require_content(&payload.content)?;

    let mut store = state.store.write().await;
    if !auth_user.can_modify(&store.get_comment(&comment_id)?.user_id) {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(store.update_comment(&comment_id, payload.content)?))
}

/// Delete a comment and its replies
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    if !auth_user.can_modify(&store.get_comment(&comment_id)?.user_id) {
        return Err(ApiError::Forbidden);
    }

    store.delete_comment(&comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .store
        .write()
        .await
        .set_comment_like(&comment_id, &auth_user.0.user_id, true)?;
    Ok(message("Comment liked"))
}

pub async fn unlike_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .store
        .write()
        .await
        .set_comment_like(&comment_id, &auth_user.0.user_id, false)?;
    Ok(message("Comment unliked"))
}
