//! Authentication middleware for JWT token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::models::User;
use tracing::debug;

use crate::{error::ApiError, jwt::TokenType, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    /// Whether this user may modify a record owned by `owner_id`
    pub fn can_modify(&self, owner_id: &str) -> bool {
        self.0.is_superuser || self.0.user_id == owner_id
    }

    pub fn require_superuser(&self) -> Result<(), ApiError> {
        if self.0.is_superuser {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Authentication middleware
///
/// Validates the bearer access token and inserts the [`AuthUser`] into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token(), TokenType::Access)
        .await
        .map_err(|e| {
            debug!("Rejected access token: {}", e);
            ApiError::Unauthorized
        })?;

    let user = state
        .store
        .read()
        .await
        .find_user(&claims.sub)
        .filter(|record| record.user.is_active)
        .map(|record| record.user.clone())
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser(user));

    Ok(next.run(req).await)
}
