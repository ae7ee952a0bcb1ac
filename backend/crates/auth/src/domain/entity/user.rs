//! User Entity
//!
//! A registered account together with its password hash.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{user_name::UserName, user_role::UserRole};

/// Registered account.
///
/// Never serialized; responses are built from [`super::principal::Principal`]
/// or dedicated DTOs so the hash cannot leak.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Canonical, unique
    pub user_name: UserName,
    pub password_hash: HashedPassword,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with the default `USER` role.
    pub fn new(user_name: UserName, password_hash: HashedPassword) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            user_role: UserRole::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.user_role = role;
        self
    }
}
