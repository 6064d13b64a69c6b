//! Client error types

use common::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

use crate::storage::StorageError;

/// Message used when a session can no longer be refreshed
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Everything a client call can fail with
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or transport failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response, with the server-provided detail
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Refresh rejected, or still unauthorized after a refresh
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Operation needs a stored token that is absent
    #[error("{0}")]
    NotAuthenticated(&'static str),

    /// Success body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Input rejected locally before any request was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Discriminant of [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Server,
    SessionExpired,
    Precondition,
    Decode,
    Storage,
    Validation,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Status { .. } => ErrorKind::Server,
            ApiError::SessionExpired => ErrorKind::SessionExpired,
            ApiError::NotAuthenticated(_) => ErrorKind::Precondition,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Storage(_) => ErrorKind::Storage,
            ApiError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// HTTP status of a server error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Type alias for client results
pub type ApiResult<T> = Result<T, ApiError>;
