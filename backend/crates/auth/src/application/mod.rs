//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod mode;
pub mod sign_in;
pub mod sign_up;
pub mod token;

// Re-exports
pub use config::{AuthConfig, ExtractionPolicy};
pub use current_user::CurrentUserUseCase;
pub use mode::ModeState;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase, ensure_admin};
pub use token::{Claims, TokenError, TokenService};
