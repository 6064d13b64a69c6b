//! Custom error types for the common library

use thiserror::Error;

/// Input rejected by one of the [`crate::validation`] rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty
    #[error("{0} is required")]
    Missing(&'static str),

    /// A field exceeded its length bounds
    #[error("{field} must be at most {max} characters long")]
    TooLong { field: &'static str, max: usize },

    /// A field did not match its expected format
    #[error("{0}")]
    Format(&'static str),
}

/// Type alias for Result with ValidationError
pub type ValidationResult<T> = Result<T, ValidationError>;
