//! Security Mode Value Object
//!
//! The process-wide switch that decides how credentials travel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `Vulnerable` hands the token to the client in the response body and
/// expects it back in `Authorization`. `Secure` keeps it in an HttpOnly
/// cookie and adds hardening response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SecurityMode {
    #[default]
    Vulnerable = 0,
    Secure = 1,
}

/// Literal that is neither `vulnerable` nor `secure`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid mode: {0}")]
pub struct InvalidSecurityMode(pub String);

impl SecurityMode {
    /// Every accepted literal, in the order shown to clients.
    pub const ALL: [SecurityMode; 2] = [SecurityMode::Vulnerable, SecurityMode::Secure];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SecurityMode::Vulnerable => "vulnerable",
            SecurityMode::Secure => "secure",
        }
    }

    #[inline]
    pub const fn is_secure(&self) -> bool {
        matches!(self, SecurityMode::Secure)
    }

    #[inline]
    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [`SecurityMode::as_u8`]. Unknown tags fall back to
    /// `Vulnerable`, which only the tag of a `Vulnerable` ever produces.
    #[inline]
    pub(crate) const fn from_u8(tag: u8) -> Self {
        match tag {
            1 => SecurityMode::Secure,
            _ => SecurityMode::Vulnerable,
        }
    }

    /// `"vulnerable, secure"`
    pub fn accepted_literals() -> String {
        Self::ALL
            .iter()
            .map(SecurityMode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for SecurityMode {
    type Err = InvalidSecurityMode;

    /// Case-insensitive. Surrounding whitespace is not trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidSecurityMode(s.to_string()))
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
