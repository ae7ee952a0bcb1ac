//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random bytes)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie rendering and `Cookie` header parsing

pub mod cookie;
pub mod crypto;
pub mod password;
