//! Category endpoints; every mutation requires a superuser

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use common::{
    models::{Category, CategoryUpdate, NewCategory},
    query::CategoryFilter,
    validation::validate_slug,
};
use serde_json::Value;

use super::message;
use crate::{error::ApiResult, middleware::AuthUser, state::AppState};

pub async fn list_categories(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Json<Vec<Category>> {
    Json(state.store.read().await.list_categories(&filter))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.store.read().await.get_category(&category_id)?))
}

pub async fn get_category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.store.read().await.get_category_by_slug(&slug)?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    auth_user.require_superuser()?;
    validate_slug(&payload.slug)?;

    let category = state.store.write().await.insert_category(payload)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(category_id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    auth_user.require_superuser()?;
    if let Some(slug) = &payload.slug {
        validate_slug(slug)?;
    }

    let category = state
        .store
        .write()
        .await
        .update_category(&category_id, payload)?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(category_id): Path<String>,
) -> ApiResult<StatusCode> {
    auth_user.require_superuser()?;
    state.store.write().await.delete_category(&category_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Link a post to a category
pub async fn add_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((category_id, post_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    auth_user.require_superuser()?;
    state
        .store
        .write()
        .await
        .link_category(&category_id, &post_id, true)?;
    Ok(message("Post added to category"))
}

pub async fn remove_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((category_id, post_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    auth_user.require_superuser()?;
    state
        .store
        .write()
        .await
        .link_category(&category_id, &post_id, false)?;
    Ok(message("Post removed from category"))
}
