//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Token validation failures are not
//! here: they never leave the authentication gate.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::security_mode::SecurityMode;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed request body or field
    #[error("{0}")]
    Validation(String),

    /// Login failed. Deliberately does not say which factor was wrong.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No principal on a protected route
    #[error("Authentication required")]
    Unauthenticated,

    /// Principal lacks the required role
    #[error("Insufficient permissions")]
    Forbidden,

    /// Mode literal other than `vulnerable` / `secure`
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// User name already exists
    #[error("User name already exists")]
    UserNameTaken,

    /// Token subject no longer has an account
    #[error("User not found")]
    UserNotFound,

    /// No route matched
    #[error("Resource not found")]
    NotFound,

    /// Password policy violation
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::InvalidMode(_)
            | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::UserNotFound | AuthError::NotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::InvalidMode(_) => err.with_action(format!(
                "Use one of: {}",
                SecurityMode::accepted_literals()
            )),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidMode(literal) => {
                tracing::warn!(mode = %literal, "Rejected security mode");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
