//! Cookie Management Infrastructure
//!
//! Rendering of `Set-Cookie` values and lookup in `Cookie` request headers.

use axum::http::{HeaderMap, HeaderValue, header, header::InvalidHeaderValue};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A cookie to be sent to the client.
///
/// Built fresh for every response and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDescriptor {
    pub name: String,
    pub value: String,
    pub http_only: bool,
    pub secure: bool,
    pub path: String,
    pub max_age_secs: i64,
    pub same_site: SameSite,
}

impl CookieDescriptor {
    /// Same cookie with an empty value and `Max-Age=0`, which tells the
    /// browser to drop it.
    pub fn expired(self) -> Self {
        Self {
            value: String::new(),
            max_age_secs: 0,
            ..self
        }
    }

    /// Render as a `Set-Cookie` header value.
    ///
    /// Attribute order: `HttpOnly; Secure; Path; Max-Age; SameSite`.
    pub fn to_set_cookie(&self) -> String {
        let mut cookie = format!("{}={}", self.name, self.value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; Path={}", self.path));
        cookie.push_str(&format!("; Max-Age={}", self.max_age_secs));
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));

        cookie
    }

    /// Fails only if the value contains bytes that are illegal in a header.
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_set_cookie())
    }
}

/// Extract a cookie value from request headers.
///
/// Every `Cookie` header is searched; the first non-empty pair named `name`
/// wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            let value = value.trim();
            (key.trim() == name && !value.is_empty()).then(|| value.to_string())
        })
}
