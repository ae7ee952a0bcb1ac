//! Authentication Gate
//!
//! Runs in front of every route. It tries to establish who the caller is
//! and never rejects: a missing, malformed or expired token leaves the
//! request anonymous. Refusing access is the job of the
//! [`CurrentPrincipal`](super::authorization::CurrentPrincipal) and
//! [`AdminPrincipal`](super::authorization::AdminPrincipal) extractors.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::{config::AuthConfig, mode::ModeState, token::TokenService};
use crate::domain::entity::principal::Principal;
use crate::presentation::transport::SessionTransportPolicy;

/// Outcome of the gate, stored in request extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authentication(pub Option<Principal>);

/// What the gate needs from the application state.
#[derive(Clone)]
pub struct GateState {
    pub mode: ModeState,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

/// Resolve the principal for a request, if any.
///
/// Token failures are logged with their reason and otherwise treated
/// exactly like an absent token.
pub fn authenticate(
    headers: &HeaderMap,
    policy: &SessionTransportPolicy,
    tokens: &TokenService,
) -> Option<Principal> {
    let credential = policy.extract(headers)?;

    tracing::debug!(
        source = credential.source.as_str(),
        mode = %policy.mode(),
        "Credential found"
    );

    match tokens.validate(&credential.token) {
        Ok(claims) => Some(Principal::new(claims.sub, claims.role)),
        Err(e) => {
            tracing::debug!(
                reason = e.reason(),
                source = credential.source.as_str(),
                "Ignoring unusable token"
            );
            None
        }
    }
}

/// Middleware: read the mode once, resolve the transport policy, attach
/// policy and principal to the request, then decorate the response.
pub async fn authentication_gate(
    State(gate): State<GateState>,
    mut req: Request,
    next: Next,
) -> Response {
    let policy = SessionTransportPolicy::resolve(gate.mode.get(), &gate.config);
    let principal = authenticate(req.headers(), &policy, &gate.tokens);

    req.extensions_mut().insert(policy);
    req.extensions_mut().insert(Authentication(principal));

    let mut response = next.run(req).await;
    policy.decorate_headers(response.headers_mut());
    response
}
