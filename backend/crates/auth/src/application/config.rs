//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Name of the cookie carrying the token in secure mode
pub const ACCESS_COOKIE_NAME: &str = "access";

/// Which transports the extractor consults in secure mode.
///
/// Vulnerable mode is always header first, then cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum ExtractionPolicy {
    /// Secure mode reads the cookie only.
    #[default]
    #[display("strict")]
    Strict,
    /// Secure mode reads the cookie, then falls back to the header.
    #[display("permissive")]
    Permissive,
}

/// Literal that is neither `strict` nor `permissive`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid extraction policy '{0}'. Use one of: strict, permissive")]
pub struct InvalidExtractionPolicy(pub String);

impl ExtractionPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExtractionPolicy::Strict => "strict",
            ExtractionPolicy::Permissive => "permissive",
        }
    }
}

impl FromStr for ExtractionPolicy {
    type Err = InvalidExtractionPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ExtractionPolicy::Strict),
            "permissive" => Ok(ExtractionPolicy::Permissive),
            _ => Err(InvalidExtractionPolicy(s.to_string())),
        }
    }
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing key (32 bytes), fixed for the process lifetime
    pub token_secret: [u8; 32],
    /// Written into and required from the `iss` claim
    pub token_issuer: String,
    /// Token lifetime, also the cookie Max-Age
    pub token_ttl: Duration,
    /// Emit `Secure` on the access cookie
    pub cookie_secure: bool,
    pub extraction_policy: ExtractionPolicy,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_issuer", &self.token_issuer)
            .field("token_ttl", &self.token_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("extraction_policy", &self.extraction_policy)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            token_issuer: "blog-backend".to_string(),
            token_ttl: Duration::from_secs(30 * 60), // 30 minutes
            cookie_secure: true,
            extraction_policy: ExtractionPolicy::Strict,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing key (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Token TTL in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
