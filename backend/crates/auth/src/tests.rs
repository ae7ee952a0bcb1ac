//! Scenario tests for the auth crate
//!
//! The full router is driven through `tower::ServiceExt::oneshot` with the
//! in-memory user store.

#[cfg(test)]
mod support {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::application::{AuthConfig, ExtractionPolicy, ModeState};
    use crate::domain::value_object::security_mode::SecurityMode;
    use crate::infra::InMemoryUserRepository;
    use crate::presentation::{AuthAppState, auth_router};

    pub const PASSWORD: &str = "correct horse battery";

    pub struct TestApp {
        pub router: Router,
        pub state: AuthAppState<InMemoryUserRepository>,
        pub repo: InMemoryUserRepository,
    }

    impl TestApp {
        pub fn new(mode: SecurityMode) -> Self {
            Self::with_policy(mode, ExtractionPolicy::Strict)
        }

        pub fn with_policy(mode: SecurityMode, policy: ExtractionPolicy) -> Self {
            let config = AuthConfig {
                extraction_policy: policy,
                ..AuthConfig::with_random_secret()
            };
            let repo = InMemoryUserRepository::new();
            let state = AuthAppState::new(repo.clone(), config, ModeState::new(mode));
            let router = auth_router(state.clone());
            Self {
                router,
                state,
                repo,
            }
        }

        pub async fn send(&self, request: Request<Body>) -> Response<Body> {
            self.router.clone().oneshot(request).await.unwrap()
        }

        pub async fn register(&self, username: &str) -> Response<Body> {
            self.send(post_json(
                "/api/auth/register",
                serde_json::json!({"username": username, "password": PASSWORD}),
            ))
            .await
        }
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    pub fn get_with(uri: &str, bearer: Option<&str>, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("access={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    pub fn set_cookie(response: &Response<Body>) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    /// Token value out of `access=<token>; HttpOnly; ...`
    pub fn cookie_token(set_cookie: &str) -> String {
        set_cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("access="))
            .unwrap()
            .to_string()
    }
}

#[cfg(test)]
mod delivery_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::support::*;
    use crate::domain::value_object::security_mode::SecurityMode;

    #[tokio::test]
    async fn test_vulnerable_login_returns_token_in_body() {
        let app = TestApp::new(SecurityMode::Vulnerable);

        let response = app.register("alice").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());
        let body = body_json(response).await;
        assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));

        let response = app
            .send(post_json(
                "/api/auth/login",
                json!({"username": "alice", "password": PASSWORD}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).is_none());
        let token = body_json(response).await["accessToken"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app.send(get_with("/api/auth/me", Some(&token), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let me = body_json(response).await;
        assert_eq!(me["username"], "alice");
        assert_eq!(me["role"], "USER");
        assert!(me["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_secure_login_sets_cookie_and_empty_body() {
        let app = TestApp::new(SecurityMode::Secure);

        let response = app.register("alice").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .send(post_json(
                "/api/auth/login",
                json!({"username": "alice", "password": PASSWORD}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("access="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=1800"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(body_bytes(response).await.is_empty());

        let token = cookie_token(&cookie);
        let response = app.send(get_with("/api/auth/me", None, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        // The header channel is closed in secure mode.
        let response = app.send(get_with("/api/auth/me", Some(&token), None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_mode_switch_applies_to_next_login() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        app.register("alice").await;

        let login = || {
            post_json(
                "/api/auth/login",
                json!({"username": "alice", "password": PASSWORD}),
            )
        };

        assert_eq!(app.send(login()).await.status(), StatusCode::OK);

        let response = app
            .send(post_json("/api/config/mode", json!({"mode": "secure"})))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.send(login()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(set_cookie(&response).is_some());
    }

    #[tokio::test]
    async fn test_logout() {
        let app = TestApp::new(SecurityMode::Secure);
        let response = app.send(post_json("/api/auth/logout", json!({}))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = set_cookie(&response).unwrap();
        assert!(cookie.starts_with("access=;"));
        assert!(cookie.contains("Max-Age=0"));

        let app = TestApp::new(SecurityMode::Vulnerable);
        let response = app.send(post_json("/api/auth/logout", json!({}))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(set_cookie(&response).is_none());
    }
}

#[cfg(test)]
mod precedence_tests {
    use axum::http::StatusCode;

    use super::support::*;
    use crate::application::ExtractionPolicy;
    use crate::domain::value_object::{security_mode::SecurityMode, user_role::UserRole};

    fn tokens(app: &TestApp) -> (String, String) {
        let header = app.state.tokens.issue("alice", UserRole::Admin).unwrap();
        let cookie = app.state.tokens.issue("bob", UserRole::Admin).unwrap();
        (header, cookie)
    }

    async fn who(app: &TestApp, bearer: Option<&str>, cookie: Option<&str>) -> Option<String> {
        let response = app
            .send(get_with("/api/admin/status", bearer, cookie))
            .await;
        match response.status() {
            StatusCode::OK => body_json(response).await["username"]
                .as_str()
                .map(str::to_string),
            StatusCode::UNAUTHORIZED => None,
            other => panic!("unexpected status {other}"),
        }
    }

    #[tokio::test]
    async fn test_vulnerable_header_wins() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        let (header, cookie) = tokens(&app);

        assert_eq!(who(&app, Some(&header), Some(&cookie)).await.as_deref(), Some("alice"));
        assert_eq!(who(&app, None, Some(&cookie)).await.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_strict_secure_uses_cookie_only() {
        let app = TestApp::new(SecurityMode::Secure);
        let (header, cookie) = tokens(&app);

        assert_eq!(who(&app, Some(&header), Some(&cookie)).await.as_deref(), Some("bob"));
        assert_eq!(who(&app, Some(&header), None).await, None);
    }

    #[tokio::test]
    async fn test_permissive_secure_falls_back_to_header() {
        let app = TestApp::with_policy(SecurityMode::Secure, ExtractionPolicy::Permissive);
        let (header, cookie) = tokens(&app);

        assert_eq!(who(&app, Some(&header), Some(&cookie)).await.as_deref(), Some("bob"));
        assert_eq!(who(&app, Some(&header), None).await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_precedence_follows_runtime_switch() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        let (header, cookie) = tokens(&app);

        assert_eq!(who(&app, Some(&header), Some(&cookie)).await.as_deref(), Some("alice"));
        assert!(app.state.mode.set("secure"));
        assert_eq!(who(&app, Some(&header), Some(&cookie)).await.as_deref(), Some("bob"));
        assert!(app.state.mode.set("vulnerable"));
        assert_eq!(who(&app, Some(&header), Some(&cookie)).await.as_deref(), Some("alice"));
    }
}

#[cfg(test)]
mod fail_open_tests {
    use axum::http::StatusCode;
    use chrono::{TimeDelta, Utc};

    use super::support::*;
    use crate::domain::value_object::{security_mode::SecurityMode, user_role::UserRole};

    #[tokio::test]
    async fn test_expired_token_is_anonymous_on_public_route() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        let expired = app
            .state
            .tokens
            .issue_at("alice", UserRole::Admin, Utc::now() - TimeDelta::hours(2))
            .unwrap();

        let response = app.send(get_with("/api/config", Some(&expired), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .send(get_with("/api/admin/status", Some(&expired), None))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_anonymous() {
        let app = TestApp::new(SecurityMode::Vulnerable);

        let response = app.send(get_with("/api/config", Some("garbage"), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .send(get_with("/api/auth/me", Some("garbage"), Some("also.garbage.here")))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_role_is_forbidden_on_admin_route() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        let token = app.state.tokens.issue("alice", UserRole::User).unwrap();

        let response = app
            .send(get_with("/api/admin/status", Some(&token), None))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_status_reports_mode() {
        let app = TestApp::new(SecurityMode::Secure);
        let token = app.state.tokens.issue("root", UserRole::Admin).unwrap();

        let response = app
            .send(get_with("/api/admin/status", None, Some(&token)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["mode"], "secure");
        assert_eq!(body["username"], "root");
    }
}

#[cfg(test)]
mod mode_endpoint_tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::json;

    use super::support::*;
    use crate::domain::value_object::security_mode::SecurityMode;

    #[tokio::test]
    async fn test_get_config() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        let response = app.send(get("/api/config")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"mode": "vulnerable"}));
    }

    #[tokio::test]
    async fn test_set_mode() {
        let app = TestApp::new(SecurityMode::Vulnerable);

        let response = app
            .send(post_json("/api/config/mode", json!({"mode": "SECURE"})))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"mode": "secure", "message": "Mode switched to secure"})
        );

        let response = app.send(get("/api/config")).await;
        assert_eq!(body_json(response).await, json!({"mode": "secure"}));
    }

    #[tokio::test]
    async fn test_invalid_mode_is_rejected_and_state_kept() {
        let app = TestApp::new(SecurityMode::Secure);

        let response = app
            .send(post_json("/api/config/mode", json!({"mode": "not-a-mode"})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["action"], "Use one of: vulnerable, secure");

        assert_eq!(app.state.mode.get(), SecurityMode::Secure);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = TestApp::new(SecurityMode::Vulnerable);

        let request = Request::post("/api/config/mode")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"mode\":"))
            .unwrap();
        assert_eq!(app.send(request).await.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(post_json("/api/config/mode", json!({"posture": "secure"})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.state.mode.get(), SecurityMode::Vulnerable);
    }
}

#[cfg(test)]
mod header_tests {
    use axum::http::{StatusCode, header};

    use super::support::*;
    use crate::domain::value_object::security_mode::SecurityMode;

    #[tokio::test]
    async fn test_secure_mode_decorates_every_response() {
        let app = TestApp::new(SecurityMode::Secure);

        for (uri, status) in [
            ("/api/config", StatusCode::OK),
            ("/api/auth/me", StatusCode::UNAUTHORIZED),
            ("/nowhere", StatusCode::NOT_FOUND),
            ("/api/nowhere", StatusCode::NOT_FOUND),
        ] {
            let response = app.send(get(uri)).await;
            assert_eq!(response.status(), status, "{uri}");
            let csp = response
                .headers()
                .get(header::CONTENT_SECURITY_POLICY)
                .unwrap_or_else(|| panic!("{uri} lacks CSP"));
            assert!(csp.to_str().unwrap().contains("frame-ancestors 'none'"));
            assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        }
    }

    #[tokio::test]
    async fn test_vulnerable_mode_adds_nothing() {
        let app = TestApp::new(SecurityMode::Vulnerable);

        for uri in ["/api/config", "/nowhere"] {
            let response = app.send(get(uri)).await;
            assert!(response.headers().get(header::CONTENT_SECURITY_POLICY).is_none());
            assert!(response.headers().get(header::X_FRAME_OPTIONS).is_none());
        }
    }
}

#[cfg(test)]
mod account_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::support::*;
    use crate::application::{AuthConfig, ensure_admin};
    use crate::domain::value_object::{
        security_mode::SecurityMode, user_name::UserName, user_role::UserRole,
    };

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        assert_eq!(app.register("alice").await.status(), StatusCode::OK);
        assert_eq!(app.register("ALICE").await.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let app = TestApp::new(SecurityMode::Vulnerable);

        assert_eq!(app.register("a!").await.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(post_json(
                "/api/auth/register",
                json!({"username": "alice", "password": "short"}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(post_json("/api/auth/register", json!({"username": "alice"})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        app.register("alice").await;

        let wrong_password = app
            .send(post_json(
                "/api/auth/login",
                json!({"username": "alice", "password": "not the password"}),
            ))
            .await;
        let unknown_user = app
            .send(post_json(
                "/api/auth/login",
                json!({"username": "mallory", "password": PASSWORD}),
            ))
            .await;

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong_password).await, body_json(unknown_user).await);
    }

    #[tokio::test]
    async fn test_me_for_removed_account_is_not_found() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        let token = body_json(app.register("alice").await).await["accessToken"]
            .as_str()
            .unwrap()
            .to_string();

        assert!(app.repo.remove(&UserName::new("alice").unwrap()).await);

        let response = app.send(get_with("/api/auth/me", Some(&token), None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bootstrap_admin() {
        let app = TestApp::new(SecurityMode::Vulnerable);
        let config = AuthConfig::default();

        assert!(ensure_admin(&app.repo, &config, "root", PASSWORD.to_string())
            .await
            .unwrap());
        assert!(!ensure_admin(&app.repo, &config, "root", PASSWORD.to_string())
            .await
            .unwrap());

        let response = app
            .send(post_json(
                "/api/auth/login",
                json!({"username": "root", "password": PASSWORD}),
            ))
            .await;
        let token = body_json(response).await["accessToken"]
            .as_str()
            .unwrap()
            .to_string();

        let claims = app.state.tokens.validate(&token).unwrap();
        assert_eq!(claims.role, UserRole::Admin);

        let response = app
            .send(get_with("/api/admin/status", Some(&token), None))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
