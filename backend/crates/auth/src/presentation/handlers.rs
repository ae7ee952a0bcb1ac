//! HTTP Handlers

use axum::extract::State;
use axum::response::Response;
use axum::{Extension, Json};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CurrentUserUseCase, ModeState, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    TokenService,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::security_mode::SecurityMode;
use crate::error::{AuthError, AuthResult};
use crate::presentation::authorization::{AdminPrincipal, CurrentPrincipal, ValidatedJson};
use crate::presentation::dto::{
    AdminStatusResponse, CredentialsRequest, MeResponse, ModeChangedResponse, ModeResponse,
    SetModeRequest,
};
use crate::presentation::gate::GateState;
use crate::presentation::transport::SessionTransportPolicy;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
    pub mode: ModeState,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig, mode: ModeState) -> Self {
        let tokens = TokenService::from_config(&config);
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            mode,
        }
    }

    pub fn gate(&self) -> GateState {
        GateState {
            mode: self.mode.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register / Login / Logout
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Extension(policy): Extension<SessionTransportPolicy>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.tokens.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    policy.deliver(output.access_token)
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Extension(policy): Extension<SessionTransportPolicy>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.tokens.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    policy.deliver(output.access_token)
}

/// POST /api/auth/logout
///
/// Always 204. Tokens are stateless, so nothing is revoked server-side.
pub async fn logout(Extension(policy): Extension<SessionTransportPolicy>) -> AuthResult<Response> {
    policy.clear()
}

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> AuthResult<Json<MeResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(&principal)
        .await?;

    Ok(Json(MeResponse {
        username: user.user_name.into_inner(),
        role: user.user_role,
        created_at: user.created_at,
    }))
}

// ============================================================================
// Security Mode
// ============================================================================

/// GET /api/config
pub async fn get_config<R>(State(state): State<AuthAppState<R>>) -> Json<ModeResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Json(ModeResponse {
        mode: state.mode.get(),
    })
}

/// POST /api/config/mode
pub async fn set_mode<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(req): ValidatedJson<SetModeRequest>,
) -> AuthResult<Json<ModeChangedResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let mode: SecurityMode = req
        .mode
        .parse()
        .map_err(|_| AuthError::InvalidMode(req.mode.clone()))?;

    let previous = state.mode.set_mode(mode);

    tracing::info!(from = %previous, to = %mode, "Security mode switched");

    Ok(Json(ModeChangedResponse {
        mode,
        message: format!("Mode switched to {mode}"),
    }))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/status
pub async fn admin_status<R>(
    State(state): State<AuthAppState<R>>,
    AdminPrincipal(principal): AdminPrincipal,
) -> Json<AdminStatusResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Json(AdminStatusResponse {
        mode: state.mode.get(),
        username: principal.username,
    })
}

/// Fallback for unknown paths. Still passes through the gate.
pub async fn not_found() -> AuthError {
    AuthError::NotFound
}
