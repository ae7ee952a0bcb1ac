//! Account passwords
//!
//! [`ClearTextPassword`] holds a policy-checked password for as long as it
//! takes to hash or verify it; [`HashedPassword`] is the Argon2id PHC string
//! that gets stored. An optional pepper is appended to the password bytes
//! before either operation.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Counted in Unicode scalar values after NFKC.
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Passwords refused regardless of length.
const DENY_LIST: &[&str] = &[
    "password",
    "password1",
    "password123",
    "letmein1",
    "iloveyou",
    "sunshine",
    "football",
    "baseball",
    "trustno1",
    "abcdefgh",
    "qwertyuiop",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    TooShort,

    #[error("Password must be at most {} characters", MAX_PASSWORD_LENGTH)]
    TooLong,

    #[error("Password cannot be blank")]
    Blank,

    #[error("Password contains control characters")]
    ControlCharacter,

    #[error("Password is too easy to guess")]
    Predictable,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is not a PHC string")]
    MalformedPhc,
}

/// A password that satisfies the account policy. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// NFKC-normalise `raw` and check it against the policy.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let raw = Zeroizing::new(raw);
        let normalized: String = raw.nfkc().collect();
        let candidate = Self(normalized);

        let length = candidate.0.chars().count();
        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::Blank);
        }
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort);
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong);
        }
        if candidate.0.chars().any(|c| c.is_control() && c != '\t') {
            return Err(PasswordPolicyError::ControlCharacter);
        }
        if is_predictable(&candidate.0) {
            return Err(PasswordPolicyError::Predictable);
        }

        Ok(candidate)
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        bytes.extend_from_slice(pepper.unwrap_or_default());
        bytes
    }

    /// Argon2id with the crate defaults (19 MiB, 2 passes) and a fresh salt.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let phc = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::Hash(e.to_string()))?;

        Ok(HashedPassword(phc.to_string()))
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// One repeated character, a run of consecutive digits, or a deny-listed
/// word in any letter case.
fn is_predictable(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    let first = chars.next();
    if chars.all(|c| Some(c) == first) {
        return true;
    }

    let digits: Vec<u32> = lower.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() == lower.chars().count()
        && digits.windows(2).all(|w| w[1] == (w[0] + 1) % 10)
    {
        return true;
    }

    DENY_LIST.contains(&lower.as_str())
}

/// Stored Argon2id hash in PHC format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Accepts anything that parses as a PHC string.
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::MalformedPhc)?;
        Ok(Self(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    /// `false` on mismatch and on a hash that no longer parses.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}
