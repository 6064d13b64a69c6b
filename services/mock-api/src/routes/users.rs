//! Registration endpoint

use axum::{Json, extract::State, http::StatusCode};
use common::{
    models::{RegisterRequest, User},
    validation::validate_registration,
};
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    password::hash_password,
    state::AppState,
};

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_registration(&payload)?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let user = state.store.write().await.insert_user(
        &payload.email,
        &payload.username,
        payload.full_name,
        password_hash,
    )?;
    info!("Registered user: {}", user.username);

    Ok((StatusCode::CREATED, Json(user)))
}
