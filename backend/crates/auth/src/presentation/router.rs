//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::repository::UserRepository;
use crate::presentation::gate::authentication_gate;
use crate::presentation::handlers::{self, AuthAppState};

/// Routes relative to `/api`.
fn api_routes<R>() -> Router<AuthAppState<R>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/register", post(handlers::register::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me::<R>))
        .route("/config", get(handlers::get_config::<R>))
        .route("/config/mode", post(handlers::set_mode::<R>))
        .route("/admin/status", get(handlers::admin_status::<R>))
}

/// Create the Auth router for any repository implementation.
///
/// Everything, unknown paths included, passes through the authentication
/// gate, which also applies the mode's response headers.
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();

    Router::new()
        .nest("/api", api_routes::<R>())
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(gate, authentication_gate))
        .with_state(state)
}
