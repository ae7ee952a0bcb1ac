//! Token Service
//!
//! Issues and validates compact HS256 session tokens:
//! `base64url(header).base64url(claims).base64url(HMAC-SHA256(key, header.claims))`.
//!
//! Tokens are stateless; nothing is stored server-side and the only way to
//! invalidate one early is to restart with a new key.

use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::crypto;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

const ALG: &str = "HS256";
const TYP: &str = "JWT";

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

/// Token claims. Exactly these six fields are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Canonical user name
    pub sub: String,
    pub role: UserRole,
    pub iss: String,
    /// Unix seconds
    pub iat: i64,
    /// Unix seconds, `iat + ttl`
    pub exp: i64,
    pub jti: String,
}

/// Why a token was not accepted.
///
/// Callers must treat both variants the same way; the split only feeds logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

impl TokenError {
    /// Value of the `reason` log field
    pub const fn reason(&self) -> &'static str {
        match self {
            TokenError::Invalid => "invalid",
            TokenError::Expired => "expired",
        }
    }
}

/// Signs and verifies session tokens with the process key.
#[derive(Clone)]
pub struct TokenService {
    key: [u8; 32],
    issuer: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(key: [u8; 32], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            key,
            issuer: issuer.into(),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.token_secret, config.token_issuer.clone(), config.token_ttl)
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `username` valid from now for the configured TTL.
    pub fn issue(&self, username: &str, role: UserRole) -> AuthResult<String> {
        self.issue_at(username, role, Utc::now())
    }

    pub fn issue_at(&self, username: &str, role: UserRole, now: DateTime<Utc>) -> AuthResult<String> {
        let iat = now.timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AuthError::Internal("token ttl out of range".to_string()))?;
        let claims = Claims {
            sub: username.to_string(),
            role,
            iss: self.issuer.clone(),
            iat,
            exp: iat.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        };
        let header = TokenHeader {
            alg: ALG.to_string(),
            typ: TYP.to_string(),
        };

        let header_b64 = encode_json(&header)?;
        let claims_b64 = encode_json(&claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = crypto::hmac_sha256(&self.key, signing_input.as_bytes());

        Ok(format!("{signing_input}.{}", crypto::to_base64url(&signature)))
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Valid iff the signature verifies, `iss` matches and
    /// `iat <= now < exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(TokenError::Invalid)?;
        let claims_b64 = parts.next().ok_or(TokenError::Invalid)?;
        let sig_b64 = parts.next().ok_or(TokenError::Invalid)?;
        if parts.next().is_some() {
            return Err(TokenError::Invalid);
        }

        let header: TokenHeader = decode_json(header_b64)?;
        if header.alg != ALG {
            return Err(TokenError::Invalid);
        }

        let signature = crypto::from_base64url(sig_b64).map_err(|_| TokenError::Invalid)?;
        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        if !crypto::verify_hmac_sha256(&self.key, signing_input.as_bytes(), &signature) {
            return Err(TokenError::Invalid);
        }

        let claims: Claims = decode_json(claims_b64)?;
        if claims.iss != self.issuer {
            return Err(TokenError::Invalid);
        }

        let now = now.timestamp();
        if now < claims.iat {
            return Err(TokenError::Invalid);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn encode_json<T: Serialize>(value: &T) -> AuthResult<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| AuthError::Internal(format!("token encoding failed: {e}")))?;
    Ok(crypto::to_base64url(&json))
}

fn decode_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = crypto::from_base64url(segment).map_err(|_| TokenError::Invalid)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Invalid)
}
