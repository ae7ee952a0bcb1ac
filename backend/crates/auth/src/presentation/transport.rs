//! Session Transport Policy
//!
//! Everything that differs between the two security modes, resolved once
//! per request: where the token is read from, how a fresh token reaches the
//! client, what logout does, and which hardening headers go out.

use axum::Json;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::cookie::{CookieDescriptor, SameSite};

use crate::application::config::{ACCESS_COOKIE_NAME, AuthConfig};
use crate::domain::value_object::security_mode::SecurityMode;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::AccessTokenResponse;
use crate::presentation::extractor::{Credential, CredentialExtractor};

/// Content-Security-Policy sent in secure mode
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self'; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data: https:; \
     font-src 'self'; \
     connect-src 'self'; \
     frame-ancestors 'none';";

/// Mode-specific transport behaviour for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTransportPolicy {
    mode: SecurityMode,
    extractor: CredentialExtractor,
    cookie_secure: bool,
    cookie_max_age_secs: i64,
}

impl SessionTransportPolicy {
    pub fn resolve(mode: SecurityMode, config: &AuthConfig) -> Self {
        Self {
            mode,
            extractor: CredentialExtractor::new(config.extraction_policy),
            cookie_secure: config.cookie_secure,
            cookie_max_age_secs: config.token_ttl_secs(),
        }
    }

    #[inline]
    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    /// Candidate token for this request, if any transport allowed in this
    /// mode carries one.
    pub fn extract(&self, headers: &HeaderMap) -> Option<Credential> {
        self.extractor.extract(headers, self.mode)
    }

    /// The `access` cookie carrying `token`.
    pub fn access_cookie(&self, token: impl Into<String>) -> CookieDescriptor {
        CookieDescriptor {
            name: ACCESS_COOKIE_NAME.to_string(),
            value: token.into(),
            http_only: true,
            secure: self.cookie_secure,
            path: "/".to_string(),
            max_age_secs: self.cookie_max_age_secs,
            same_site: SameSite::Strict,
        }
    }

    /// Hand a freshly issued token to the client.
    ///
    /// - secure: `204 No Content` with the token in an HttpOnly cookie
    /// - vulnerable: `200 OK` with `{"accessToken": ...}` and no cookie
    pub fn deliver(&self, token: String) -> AuthResult<Response> {
        match self.mode {
            SecurityMode::Secure => {
                let cookie = set_cookie_header(&self.access_cookie(token))?;
                Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
            }
            SecurityMode::Vulnerable => Ok((
                StatusCode::OK,
                Json(AccessTokenResponse {
                    access_token: token,
                }),
            )
                .into_response()),
        }
    }

    /// Logout. Secure mode expires the cookie; vulnerable mode leaves it to
    /// the client to forget its copy.
    pub fn clear(&self) -> AuthResult<Response> {
        match self.mode {
            SecurityMode::Secure => {
                let cookie = set_cookie_header(&self.access_cookie("").expired())?;
                Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
            }
            SecurityMode::Vulnerable => Ok(StatusCode::NO_CONTENT.into_response()),
        }
    }

    /// Applied to every response. Vulnerable mode adds nothing.
    pub fn decorate_headers(&self, headers: &mut HeaderMap) {
        if self.mode.is_secure() {
            headers.insert(
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_static(CONTENT_SECURITY_POLICY),
            );
            headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        }
    }
}

fn set_cookie_header(cookie: &CookieDescriptor) -> AuthResult<HeaderValue> {
    cookie
        .to_header_value()
        .map_err(|e| AuthError::Internal(format!("Invalid Set-Cookie value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy(mode: SecurityMode) -> SessionTransportPolicy {
        let config = AuthConfig {
            token_ttl: Duration::from_secs(900),
            ..AuthConfig::default()
        };
        SessionTransportPolicy::resolve(mode, &config)
    }

    fn set_cookie(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_secure_delivery_sets_cookie_only() {
        let response = policy(SecurityMode::Secure)
            .deliver("abc.def.ghi".to_string())
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            set_cookie(&response),
            Some("access=abc.def.ghi; HttpOnly; Secure; Path=/; Max-Age=900; SameSite=Strict")
        );
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_secure_attribute_follows_config() {
        let config = AuthConfig {
            cookie_secure: false,
            ..AuthConfig::default()
        };
        let cookie = SessionTransportPolicy::resolve(SecurityMode::Secure, &config)
            .access_cookie("tok")
            .to_set_cookie();
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_vulnerable_delivery_is_json_without_cookie() {
        let response = policy(SecurityMode::Vulnerable)
            .deliver("abc.def.ghi".to_string())
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_secure_clear_expires_cookie() {
        let response = policy(SecurityMode::Secure).clear().unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("access=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_vulnerable_clear_is_noop() {
        let response = policy(SecurityMode::Vulnerable).clear().unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(set_cookie(&response).is_none());
    }

    #[test]
    fn test_decorate_headers() {
        let mut headers = HeaderMap::new();
        policy(SecurityMode::Vulnerable).decorate_headers(&mut headers);
        assert!(headers.is_empty());

        policy(SecurityMode::Secure).decorate_headers(&mut headers);
        let csp = headers.get(header::CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("script-src 'self'"));
        assert!(csp.contains("frame-ancestors 'none'"));
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    }

    #[test]
    fn test_cookie_injection_is_internal_error() {
        let result = policy(SecurityMode::Secure).deliver("tok\r\nX-Evil: 1".to_string());
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
