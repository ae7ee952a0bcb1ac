//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, the authentication gate and the
//! mode-dependent credential transport.

pub mod authorization;
pub mod dto;
pub mod extractor;
pub mod gate;
pub mod handlers;
pub mod router;
pub mod transport;

pub use authorization::{AdminPrincipal, CurrentPrincipal, ValidatedJson};
pub use extractor::{Credential, CredentialExtractor, CredentialSource};
pub use gate::{Authentication, GateState, authenticate, authentication_gate};
pub use handlers::AuthAppState;
pub use router::auth_router;
pub use transport::SessionTransportPolicy;
