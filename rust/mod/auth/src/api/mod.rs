mod auth;
mod me;
mod middleware;
mod oauth;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Build the complete auth API router, rooted at `/auth`.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    let api = Router::new()
        .merge(auth::routes())
        .merge(oauth::routes())
        .merge(me::routes());

    Router::new()
        .nest("/auth", api)
        .layer(axum::middleware::from_fn_with_state(
            svc.clone(),
            middleware::session_middleware,
        ))
        .with_state(svc)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::service::testutil::{test_provider, test_service_with};
    use crate::service::AuthConfig;

    fn test_router() -> Router {
        let mut config = AuthConfig::default();
        config
            .providers
            .insert("test".to_string(), test_provider("test"));
        super::build_router(test_service_with(config))
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie.to_string());
        }
        builder.body(Body::empty()).unwrap()
    }

    /// Extract the `qid=...` pair from a Set-Cookie header.
    fn session_cookie(resp: &axum::http::Response<Body>) -> Option<String> {
        let raw = resp.headers().get(header::SET_COOKIE)?.to_str().ok()?;
        raw.split(';').next().map(|s| s.to_string())
    }

    async fn body_json(resp: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_body(email: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "email": email,
            "name": name,
            "password": "pw1234",
            "first_name": "Ada",
            "last_name": "Lovelace",
        })
    }

    #[tokio::test]
    async fn test_register_login_me_logout_flow() {
        let app = test_router();

        // Register: session cookie set, success body.
        let resp = app
            .clone()
            .oneshot(json_request("/auth/register", register_body("ada@example.com", "ada")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = session_cookie(&resp).expect("register sets session cookie");
        assert!(cookie.starts_with("qid="));
        assert_eq!(body_json(resp).await, serde_json::json!({"success": true}));

        // me with the cookie returns the created record.
        let resp = app
            .clone()
            .oneshot(get_request("/auth/me", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["email"], "ada@example.com");
        assert!(body["data"]["id"].is_string());

        // Logout clears the session and invalidates the cookie.
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .header(header::COOKIE, cookie.clone())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let removal = session_cookie(&resp).expect("logout sets removal cookie");
        assert_eq!(removal, "qid=");

        // The old cookie no longer resolves: me is 401, not 404.
        let resp = app
            .clone()
            .oneshot(get_request("/auth/me", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(json_request("/auth/register", register_body("ada@example.com", "ada")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(json_request("/auth/register", register_body("ada@example.com", "ada2")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "user name/email taken");
    }

    #[tokio::test]
    async fn test_login_sets_session_for_registered_user() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(json_request("/auth/register", register_body("ada@example.com", "ada")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(json_request(
                "/auth/login",
                serde_json::json!({"identifier": "ada@example.com", "password": "pw1234"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = session_cookie(&resp).expect("login sets session cookie");

        // The session resolves to the registered user.
        let resp = app
            .clone()
            .oneshot(get_request("/auth/session", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["role"], "USER");
    }

    #[tokio::test]
    async fn test_login_failures_keep_distinct_messages() {
        let app = test_router();

        app.clone()
            .oneshot(json_request("/auth/register", register_body("ada@example.com", "ada")))
            .await
            .unwrap();

        // Unknown identifier: 404 with its own message. This response
        // reveals whether an account exists — the deployed behavior,
        // asserted here so hardening it is a visible decision.
        let resp = app
            .clone()
            .oneshot(json_request(
                "/auth/login",
                serde_json::json!({"identifier": "ghost@example.com", "password": "pw1234"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(session_cookie(&resp).is_none());
        assert_eq!(body_json(resp).await["message"], "no such user");

        // Wrong password: 401 with a different message, no session.
        let resp = app
            .clone()
            .oneshot(json_request(
                "/auth/login",
                serde_json::json!({"identifier": "ada@example.com", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&resp).is_none());
        assert_eq!(body_json(resp).await["message"], "invalid credentials");
    }

    #[tokio::test]
    async fn test_protected_routes_without_session() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(get_request("/auth/session", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app
            .clone()
            .oneshot(get_request("/auth/me", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // A forged cookie fares no better than none.
        let resp = app
            .clone()
            .oneshot(get_request("/auth/me", Some("qid=forged.signature")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_session_still_succeeds() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({"success": true}));
    }

    #[tokio::test]
    async fn test_oauth_start_redirects_to_provider() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(get_request("/auth/oauth/test", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(location.starts_with("https://provider.example/oauth/authorize?"));
        assert!(location.contains("scope=profile+email"));
    }

    #[tokio::test]
    async fn test_oauth_callback_failure_renders_html() {
        let app = test_router();

        // An unknown provider fails before any network traffic; the
        // callback failure path answers with an HTML snippet, unlike
        // the JSON everywhere else.
        let resp = app
            .clone()
            .oneshot(get_request("/auth/oauth/nope/callback?code=abc", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.starts_with("<h1>"));
    }

    #[tokio::test]
    async fn test_login_failed_sink() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(get_request("/auth/login/failed", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["message"], "error while logging");
    }

    #[tokio::test]
    async fn test_me_returns_stored_record_unredacted() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(json_request("/auth/register", register_body("ada@example.com", "ada")))
            .await
            .unwrap();
        let cookie = session_cookie(&resp).unwrap();

        let resp = app
            .clone()
            .oneshot(get_request("/auth/me", Some(&cookie)))
            .await
            .unwrap();
        let body = body_json(resp).await;
        // The full record comes back, password hash included. Known
        // gap: redacting it is a deliberate API change, not a cleanup.
        assert!(body["data"]["password_hash"]
            .as_str()
            .unwrap()
            .starts_with("$argon2"));
    }
}
