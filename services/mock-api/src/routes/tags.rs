//! Tag endpoints; every mutation requires a superuser

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use common::{
    models::{NewTag, Tag, TagUpdate},
    query::Pagination,
    validation::validate_slug,
};
use serde_json::Value;

use super::message;
use crate::{error::ApiResult, middleware::AuthUser, state::AppState};

pub async fn list_tags(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Json<Vec<Tag>> {
    Json(state.store.read().await.list_tags(&pagination))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(state.store.read().await.get_tag(&tag_id)?))
}

pub async fn get_tag_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(state.store.read().await.get_tag_by_slug(&slug)?))
}

pub async fn create_tag(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<NewTag>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    auth_user.require_superuser()?;
    validate_slug(&payload.slug)?;

    let tag = state.store.write().await.insert_tag(payload)?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(tag_id): Path<String>,
    Json(payload): Json<TagUpdate>,
) -> ApiResult<Json<Tag>> {
    auth_user.require_superuser()?;
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }

    Ok(Json(state.store.write().await.update_tag(&tag_id, payload)?))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(tag_id): Path<String>,
) -> ApiResult<StatusCode> {
    auth_user.require_superuser()?;
    state.store.write().await.delete_tag(&tag_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Link a post to a tag
pub async fn add_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((tag_id, post_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    auth_user.require_superuser()?;
    state.store.write().await.link_tag(&tag_id, &post_id, true)?;
    Ok(message("Post added to tag"))
}

pub async fn remove_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((tag_id, post_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    auth_user.require_superuser()?;
    state.store.write().await.link_tag(&tag_id, &post_id, false)?;
    Ok(message("Post removed from tag"))
}
