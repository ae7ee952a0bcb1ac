//! Sign Up Use Case
//!
//! Creates a new user account and issues its first token.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_name: UserName,
    pub user_role: UserRole,
    pub access_token: String,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let user_name =
            UserName::new(input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let user = new_user(user_name, input.password, self.config.pepper())?;
        self.user_repo.create(&user).await?;

        let access_token = self.tokens.issue(user.user_name.as_str(), user.user_role)?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up"
        );

        Ok(SignUpOutput {
            user_name: user.user_name,
            user_role: user.user_role,
            access_token,
        })
    }
}

/// Validate and hash `password`, then build a `USER` account.
pub(crate) fn new_user(
    user_name: UserName,
    password: String,
    pepper: Option<&[u8]>,
) -> AuthResult<User> {
    let password = ClearTextPassword::new(password)
        .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;
    let password_hash = password
        .hash(pepper)
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(User::new(user_name, password_hash))
}

/// Seed an `ADMIN` account unless one with that name already exists.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin<U>(
    user_repo: &U,
    config: &AuthConfig,
    user_name: &str,
    password: String,
) -> AuthResult<bool>
where
    U: UserRepository,
{
    let user_name = UserName::new(user_name).map_err(|e| AuthError::Validation(e.to_string()))?;

    if user_repo.exists_by_user_name(&user_name).await? {
        tracing::debug!(user_name = %user_name, "Bootstrap admin already present");
        return Ok(false);
    }

    let admin = new_user(user_name, password, config.pepper())?.with_role(UserRole::Admin);
    user_repo.create(&admin).await?;

    tracing::info!(user_name = %admin.user_name, "Bootstrap admin created");
    Ok(true)
}
