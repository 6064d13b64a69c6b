//! Custom error types for the mock API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{ValidationError, models::ErrorBody};
use thiserror::Error;

use crate::store::StoreError;

/// Custom error type for the mock API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed or revoked bearer token
    #[error("Could not validate credentials")]
    Unauthorized,

    /// Login with unknown email or wrong password
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Authenticated but not allowed to touch the resource
    #[error("Not enough permissions")]
    Forbidden,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Missing record
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Conflict(message) => ApiError::BadRequest(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
