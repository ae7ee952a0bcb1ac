//! Current User Use Case
//!
//! Loads the account behind the request principal.

use std::sync::Arc;

use crate::domain::entity::{principal::Principal, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// [`AuthError::UserNotFound`] when the account was removed after the
    /// token was issued.
    pub async fn execute(&self, principal: &Principal) -> AuthResult<User> {
        let user_name = UserName::from_db(principal.username.clone());

        self.user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
