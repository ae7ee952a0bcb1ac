//! Server Configuration
//!
//! Read once at startup from the environment (`.env` supported).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::{AuthConfig, ExtractionPolicy, SecurityMode};
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Longest accepted token lifetime: one year.
const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Bootstrap admin credentials
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub auth: AuthConfig,
    pub initial_mode: SecurityMode,
    pub admin: Option<AdminSeed>,
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `lookup` returns the raw value of a variable; empty values count as
    /// unset. `development` relaxes the key and cookie requirements.
    pub fn from_lookup<F>(lookup: F, development: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base = if development {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };

        let token_secret = match var("AUTH_TOKEN_SECRET") {
            Some(encoded) => decode_secret(&encoded)?,
            None if development => {
                tracing::warn!("AUTH_TOKEN_SECRET not set, using a random key for this process");
                base.token_secret
            }
            None => bail!("AUTH_TOKEN_SECRET must be set in production"),
        };

        let token_issuer = var("AUTH_TOKEN_ISSUER").unwrap_or_else(|| base.token_issuer.clone());

        let token_ttl = match var("AUTH_TOKEN_TTL_MINUTES") {
            Some(raw) => {
                let minutes: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("AUTH_TOKEN_TTL_MINUTES is not a number: {raw}"))?;
                if minutes == 0 {
                    bail!("AUTH_TOKEN_TTL_MINUTES must be positive");
                }
                match minutes.checked_mul(60) {
                    Some(secs) if secs <= MAX_TOKEN_TTL_SECS => Duration::from_secs(secs),
                    _ => bail!("AUTH_TOKEN_TTL_MINUTES is too large: {raw}"),
                }
            }
            None => base.token_ttl,
        };

        let cookie_secure = match var("AUTH_COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("AUTH_COOKIE_SECURE must be true or false: {raw}"))?,
            None => base.cookie_secure,
        };

        let extraction_policy = match var("AUTH_EXTRACTION_POLICY") {
            Some(raw) => raw.parse::<ExtractionPolicy>()?,
            None => ExtractionPolicy::default(),
        };

        let password_pepper = var("AUTH_PASSWORD_PEPPER").map(String::into_bytes);

        let initial_mode = match var("SECURITY_MODE") {
            Some(raw) => raw.trim().parse::<SecurityMode>().with_context(|| {
                format!(
                    "SECURITY_MODE must be one of: {}",
                    SecurityMode::accepted_literals()
                )
            })?,
            None => SecurityMode::default(),
        };

        let admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed { username, password }),
            (None, None) => None,
            _ => bail!("ADMIN_USERNAME and ADMIN_PASSWORD must be set together"),
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let bind_raw = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_raw}"))?;

        Ok(Self {
            auth: AuthConfig {
                token_secret,
                token_issuer,
                token_ttl,
                cookie_secure,
                extraction_policy,
                password_pepper,
            },
            initial_mode,
            admin,
            database_url: var("DATABASE_URL"),
            frontend_origins,
            bind_addr,
        })
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("AUTH_TOKEN_SECRET is not valid base64")?;
    let secret: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
        anyhow::anyhow!("AUTH_TOKEN_SECRET must decode to 32 bytes, got {}", b.len())
    })?;
    Ok(secret)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], development: bool) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned(), development)
    }

    fn secret_b64() -> String {
        general_purpose::STANDARD.encode([9u8; 32])
    }

    #[test]
    fn test_development_defaults() {
        let config = load(&[], true).unwrap();
        assert!(!config.auth.cookie_secure);
        assert_eq!(config.auth.token_issuer, "blog-backend");
        assert_eq!(config.auth.token_ttl, Duration::from_secs(1800));
        assert_eq!(config.auth.extraction_policy, ExtractionPolicy::Strict);
        assert_eq!(config.initial_mode, SecurityMode::Vulnerable);
        assert!(config.admin.is_none());
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.frontend_origins.len(), 2);
    }

    #[test]
    fn test_production_requires_secret() {
        assert!(load(&[], false).is_err());

        let secret = secret_b64();
        let config = load(&[("AUTH_TOKEN_SECRET", &secret)], false).unwrap();
        assert_eq!(config.auth.token_secret, [9u8; 32]);
        assert!(config.auth.cookie_secure);
    }

    #[test]
    fn test_bad_secret_rejected() {
        assert!(load(&[("AUTH_TOKEN_SECRET", "***")], true).is_err());
        let short = general_purpose::STANDARD.encode([1u8; 16]);
        assert!(load(&[("AUTH_TOKEN_SECRET", &short)], true).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(
            &[
                ("AUTH_TOKEN_TTL_MINUTES", "5"),
                ("AUTH_COOKIE_SECURE", "true"),
                ("AUTH_EXTRACTION_POLICY", "permissive"),
                ("SECURITY_MODE", "Secure"),
                ("ADMIN_USERNAME", "root"),
                ("ADMIN_PASSWORD", "correct horse battery"),
                ("FRONTEND_ORIGINS", "https://a.example, https://b.example,"),
                ("BIND_ADDR", "127.0.0.1:9000"),
            ],
            true,
        )
        .unwrap();

        assert_eq!(config.auth.token_ttl, Duration::from_secs(300));
        assert!(config.auth.cookie_secure);
        assert_eq!(config.auth.extraction_policy, ExtractionPolicy::Permissive);
        assert_eq!(config.initial_mode, SecurityMode::Secure);
        assert_eq!(config.admin.unwrap().username, "root");
        assert_eq!(
            config.frontend_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn test_invalid_values_abort() {
        for (key, value) in [
            ("AUTH_TOKEN_TTL_MINUTES", "soon"),
            ("AUTH_TOKEN_TTL_MINUTES", "0"),
            ("AUTH_TOKEN_TTL_MINUTES", "18446744073709551615"),
            ("AUTH_TOKEN_TTL_MINUTES", "525601"),
            ("AUTH_COOKIE_SECURE", "maybe"),
            ("AUTH_EXTRACTION_POLICY", "lenient"),
            ("SECURITY_MODE", "safe"),
            ("BIND_ADDR", "localhost"),
            ("ADMIN_USERNAME", "root"),
        ] {
            assert!(load(&[(key, value)], true).is_err(), "{key}={value}");
        }
    }

    #[test]
    fn test_ttl_upper_bound() {
        let config = load(&[("AUTH_TOKEN_TTL_MINUTES", "525600")], true).unwrap();
        assert_eq!(config.auth.token_ttl, Duration::from_secs(MAX_TOKEN_TTL_SECS));
    }

    #[test]
    fn test_debug_hides_admin_password() {
        let config = load(
            &[("ADMIN_USERNAME", "root"), ("ADMIN_PASSWORD", "hunter2 hunter2")],
            true,
        )
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
