//! Credential Extractor
//!
//! Finds the candidate token on a request. Which transports are consulted,
//! and in which order, depends on the security mode and the configured
//! [`ExtractionPolicy`].
//!
//! | mode       | strict          | permissive       |
//! |------------|-----------------|------------------|
//! | vulnerable | header, cookie  | header, cookie   |
//! | secure     | cookie          | cookie, header   |

use axum::http::{HeaderMap, header};

use crate::application::config::{ACCESS_COOKIE_NAME, ExtractionPolicy};
use crate::domain::value_object::security_mode::SecurityMode;

const BEARER_PREFIX: &str = "Bearer ";

/// Where a credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Cookie,
}

impl CredentialSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Header => "header",
            CredentialSource::Cookie => "cookie",
        }
    }
}

/// A raw, not yet validated token and its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub source: CredentialSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CredentialExtractor {
    policy: ExtractionPolicy,
}

impl CredentialExtractor {
    pub const fn new(policy: ExtractionPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub const fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    /// Transports to consult for `mode`, in precedence order.
    pub const fn sources(&self, mode: SecurityMode) -> &'static [CredentialSource] {
        use CredentialSource::*;
        match (mode, self.policy) {
            (SecurityMode::Vulnerable, _) => &[Header, Cookie],
            (SecurityMode::Secure, ExtractionPolicy::Strict) => &[Cookie],
            (SecurityMode::Secure, ExtractionPolicy::Permissive) => &[Cookie, Header],
        }
    }

    /// First usable credential, or `None`. Never fails.
    pub fn extract(&self, headers: &HeaderMap, mode: SecurityMode) -> Option<Credential> {
        self.sources(mode).iter().find_map(|&source| {
            let token = match source {
                CredentialSource::Header => bearer_token(headers),
                CredentialSource::Cookie => access_cookie(headers),
            }?;
            Some(Credential { token, source })
        })
    }
}

/// `Authorization: Bearer <token>`. The scheme is matched case-sensitively;
/// an empty token counts as absent.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn access_cookie(headers: &HeaderMap) -> Option<String> {
    platform::cookie::extract_cookie(headers, ACCESS_COOKIE_NAME)
}
