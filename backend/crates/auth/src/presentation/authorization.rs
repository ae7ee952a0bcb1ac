//! Request Extractors
//!
//! Authorization decisions made from the gate's [`Authentication`], and a
//! JSON body extractor that reports malformed input as a validation error.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::domain::entity::principal::Principal;
use crate::error::AuthError;
use crate::presentation::gate::Authentication;

fn principal(parts: &Parts) -> Option<Principal> {
    parts
        .extensions
        .get::<Authentication>()
        .and_then(|auth| auth.0.clone())
}

/// Any authenticated caller. Anonymous requests get 401.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal(parts)
            .map(CurrentPrincipal)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// An `ADMIN` caller. Anonymous requests get 401, other roles 403.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AdminPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = principal(parts).ok_or(AuthError::Unauthenticated)?;
        if !principal.is_admin() {
            tracing::debug!(username = %principal.username, "Admin route refused");
            return Err(AuthError::Forbidden);
        }
        Ok(AdminPrincipal(principal))
    }
}

/// `Json<T>` whose rejection is [`AuthError::Validation`] (400).
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => Err(AuthError::Validation(rejection.body_text())),
        }
    }
}
