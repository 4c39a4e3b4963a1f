//! Shared primitives for all Rust crates in crmdesk.

#![forbid(unsafe_code)]

/// Identity primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::{CurrentUser, UserType};

/// Result type used across crmdesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input, configuration, or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// User is authenticated but blocked by the permission table.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
