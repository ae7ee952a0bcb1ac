//! Application Error
//!
//! The one error shape that crosses the HTTP boundary.

use std::borrow::Cow;
use std::fmt;

use super::kind::ErrorKind;

/// What the client is told about a failed request.
///
/// Each crate builds one of these from its own error enum just before the
/// response is written.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::BadRequest, "Invalid mode")
///     .with_action("Use one of: vulnerable, secure");
/// assert_eq!(err.status_code(), 400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
}

impl AppError {
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
        }
    }

    /// Hint telling the client what to send instead.
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `None` for server errors, whatever was attached.
    pub fn public_action(&self) -> Option<&str> {
        if self.kind.is_server_error() {
            None
        } else {
            self.action.as_deref()
        }
    }

    /// Server errors collapse to a fixed string so internal messages never
    /// leak.
    pub fn public_message(&self) -> &str {
        if self.kind.is_server_error() {
            "Internal server error"
        } else {
            &self.message
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
