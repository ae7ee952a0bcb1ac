//! Principal
//!
//! The authenticated identity attached to a request by the gate.

use crate::domain::value_object::user_role::UserRole;

/// Who the caller is, as asserted by a valid token.
///
/// Only lives for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: UserRole,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: UserRole) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
