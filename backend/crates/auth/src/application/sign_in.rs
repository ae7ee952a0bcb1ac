//! Sign In Use Case
//!
//! Verifies a user name and password and issues a token.

use std::sync::{Arc, OnceLock};

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user_name: UserName,
    pub user_role: UserRole,
    pub access_token: String,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
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

    /// Every failure mode (malformed name, unknown user, policy-violating
    /// or wrong password) ends in the same [`AuthError::InvalidCredentials`].
    /// A name without an account still pays for one Argon2 verification.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = match UserName::new(&input.user_name) {
            Ok(user_name) => self.user_repo.find_by_user_name(&user_name).await?,
            Err(_) => None,
        };

        let user = verify_password(user, &password, self.config.pepper())
            .ok_or(AuthError::InvalidCredentials)?;

        let access_token = self.tokens.issue(user.user_name.as_str(), user.user_role)?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed in"
        );

        Ok(SignInOutput {
            user_name: user.user_name,
            user_role: user.user_role,
            access_token,
        })
    }
}

/// Stand-in hash verified when there is no account, so both outcomes cost
/// the same Argon2 work.
static DUMMY_HASH: OnceLock<Option<HashedPassword>> = OnceLock::new();

fn dummy_hash() -> Option<&'static HashedPassword> {
    DUMMY_HASH
        .get_or_init(|| {
            ClearTextPassword::new("no account has this password".to_string())
                .ok()?
                .hash(None)
                .ok()
        })
        .as_ref()
}

/// The account, if it exists and `password` matches its hash.
fn verify_password(
    user: Option<User>,
    password: &ClearTextPassword,
    pepper: Option<&[u8]>,
) -> Option<User> {
    match user {
        Some(user) => user.password_hash.verify(password, pepper).then_some(user),
        None => {
            if let Some(hash) = dummy_hash() {
                let _ = hash.verify(password, pepper);
            }
            None
        }
    }
}
