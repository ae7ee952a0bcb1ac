//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Token service, security mode, use cases
//! - `infra/` - Postgres and in-memory user stores
//! - `presentation/` - Gate, credential transport, handlers, router
//!
//! ## Features
//! - Register / login with user name + password, stateless HS256 tokens
//! - Runtime-switchable security mode:
//!   - `vulnerable`: token returned in the body, read from `Authorization`
//!     (cookie as fallback), no hardening headers
//!   - `secure`: token in an HttpOnly `SameSite=Strict` cookie, CSP and
//!     `X-Frame-Options: DENY` on every response
//! - Fail-open gate: a bad token is the same as no token; protected routes
//!   refuse anonymous callers on their own
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - One signing key per process, no rotation or revocation

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::{AuthConfig, ExtractionPolicy, ModeState, TokenService, ensure_admin};
pub use domain::SecurityMode;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::{AuthAppState, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
