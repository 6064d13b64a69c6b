//! Common library for the blog platform
//!
//! This crate holds the wire models shared by the API client and the mock
//! backend, the list filters with their query-string encoding, and the
//! input validation rules applied on both sides.

pub mod error;
pub mod models;
pub mod query;
pub mod validation;

pub use error::ValidationError;
