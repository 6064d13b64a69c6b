//! Login, token refresh and current-user endpoints

use axum::{Extension, Json, extract::State};
use common::models::{LoginRequest, RefreshTokenRequest, TokenResponse, User};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    jwt::TokenType,
    middleware::AuthUser,
    password::verify_password,
    state::AppState,
};

fn token_pair(state: &AppState, user: &User, refresh_token: String) -> ApiResult<TokenResponse> {
    let access_token = state
        .jwt_service
        .generate_access_token(user)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
    })
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    info!("Login attempt for: {}", payload.email);

    let user = {
        let store = state.store.read().await;
        let record = store
            .find_user_by_email(&payload.email)
            .ok_or(ApiError::InvalidCredentials)?;

        let valid = verify_password(&record.password_hash, &payload.password).map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;
        if !valid {
            warn!("Wrong password for: {}", payload.email);
            return Err(ApiError::InvalidCredentials);
        }
        if !record.user.is_active {
            return Err(ApiError::BadRequest("Inactive user".to_string()));
        }
        record.user.clone()
    };

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(&user)
        .map_err(|e| {
            error!("Failed to generate refresh token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(token_pair(&state, &user, refresh_token)?))
}

/// Refresh token endpoint
///
/// Rotates the refresh token: the presented one is revoked and a new pair
/// is returned.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    state.record_refresh_request();
    info!("Token refresh request");

    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token, TokenType::Refresh)
        .await
        .map_err(|e| {
            warn!("Rejected refresh token: {}", e);
            ApiError::Unauthorized
        })?;

    let user = state
        .store
        .read()
        .await
        .find_user(&claims.sub)
        .map(|record| record.user.clone())
        .ok_or(ApiError::Unauthorized)?;

    let new_refresh_token = state
        .jwt_service
        .rotate_refresh_token(&user, &claims)
        .await
        .map_err(|e| {
            warn!("Failed to rotate refresh token: {}", e);
            ApiError::Unauthorized
        })?;

    Ok(Json(token_pair(&state, &user, new_refresh_token)?))
}

/// Profile of the bearer of the access token
pub async fn current_user(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<User> {
    Json(user)
}
