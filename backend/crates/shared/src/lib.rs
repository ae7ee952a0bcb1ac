//! Shared Kernel
//!
//! The few pieces of vocabulary every backend crate agrees on:
//! - the unified error type rendered at the HTTP boundary
//! - typed UUID identifiers
//!
//! Nothing here knows about tokens, cookies or security modes.

pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
pub mod id;
