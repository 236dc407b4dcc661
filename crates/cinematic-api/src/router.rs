use std::path::PathBuf;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{auth, generate, health, status};
use crate::middleware::auth_gate;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.config.app.static_dir);
    let login_page = ServeFile::new(static_dir.join("login.html"));

    let router = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/api/auth", post(auth::login).delete(auth::logout))
        // Generation proxy
        .route("/api/generate", post(generate::submit))
        .route("/api/status/{job_id}", get(status::poll))
        // Login page and static assets
        .route_service(state.gate.login_path(), login_page)
        .fallback_service(ServeDir::new(&static_dir))
        // Every route, including the static fallback, sits behind the gate
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .with_state(state.clone());

    let router = match cors_layer(&state.config.app.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use cinematic_shared::AppConfig;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::pipeline::{MockPipelineClient, PipelineError};

    fn test_state(pipeline: MockPipelineClient) -> AppState {
        let mut config = AppConfig::default();
        config.auth.session_secret = Some("router-test-secret".to_string());
        config.app.static_dir = "/nonexistent-static-dir".to_string();
        AppState::new(config, Arc::new(pipeline)).unwrap()
    }

    fn app(pipeline: MockPipelineClient) -> (Router, AppState) {
        let state = test_state(pipeline);
        (build_router(state.clone()), state)
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("cinematic_auth={}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_login_with_correct_password_sets_cookie() {
        let (app, state) = app(MockPipelineClient::new());

        let response = app
            .oneshot(request("POST", "/api/auth", None, Some(r#"{"password":"demo123"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie(&response).expect("cookie set");
        assert!(cookie.starts_with("cinematic_auth="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));

        let token = state.cookie.find_in_set_cookie(&cookie).unwrap();
        assert!(state.sessions.decode(token).is_ok());
        assert_eq!(json_body(response).await, json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        for body in [
            r#"{"password":"wrong"}"#,
            r#"{}"#,
            r#"{"password":""}"#,
            r#"{"password":null}"#,
            r#"{"password":42}"#,
            r#"{"password":["demo123"]}"#,
        ] {
            let (app, _) = app(MockPipelineClient::new());
            let response = app
                .oneshot(request("POST", "/api/auth", None, Some(body)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "body {}", body);
            assert!(set_cookie(&response).is_none());
            assert_eq!(
                json_body(response).await,
                json!({ "success": false, "error": "Invalid password" })
            );
        }
    }

    #[tokio::test]
    async fn test_login_with_unparseable_body_is_server_error() {
        for body in ["not json", "null", "[]", r#"["demo123"]"#, r#""demo123""#, "42"] {
            let (app, _) = app(MockPipelineClient::new());
            let response = app
                .oneshot(request("POST", "/api/auth", None, Some(body)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "body {}", body);
            assert!(set_cookie(&response).is_none(), "body {}", body);
            assert_eq!(
                json_body(response).await,
                json!({ "success": false, "error": "Server error" })
            );
        }
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_without_session() {
        for cookie in [None, Some("garbage")] {
            let (app, _) = app(MockPipelineClient::new());
            let response = app
                .oneshot(request("DELETE", "/api/auth", cookie, None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
            assert_eq!(json_body(response).await, json!({ "success": true }));
        }
    }

    #[tokio::test]
    async fn test_protected_path_without_cookie_redirects() {
        for uri in ["/", "/api/status/abc123", "/videos"] {
            let (app, _) = app(MockPipelineClient::new());
            let response = app.oneshot(request("GET", uri, None, None)).await.unwrap();

            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", uri);
            assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
            assert!(set_cookie(&response).is_none());
        }
    }

    #[tokio::test]
    async fn test_empty_cookie_counts_as_missing() {
        let (app, _) = app(MockPipelineClient::new());
        let response = app
            .oneshot(request("GET", "/", Some(""), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
        assert!(set_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_malformed_cookie_redirects_and_clears() {
        let (app, _) = app(MockPipelineClient::new());
        let forged = "YXV0aGVudGljYXRlZDoxNzAwMDAwMDAwMDAw"; // "authenticated:1700000000000"

        let response = app
            .oneshot(request("GET", "/", Some(forged), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
        let cleared = set_cookie(&response).unwrap();
        assert!(cleared.starts_with("cinematic_auth=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_exempt_paths_are_not_redirected() {
        for uri in ["/login", "/assets/app.js", "/logo.png", "/favicon.ico"] {
            let (app, _) = app(MockPipelineClient::new());
            let response = app.oneshot(request("GET", uri, None, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }

        let (app, _) = app(MockPipelineClient::new());
        let response = app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_generate_relays_pipeline_body() {
        let mut pipeline = MockPipelineClient::new();
        pipeline
            .expect_submit()
            .withf(|payload| payload == &json!({ "script": "hello world", "aspectRatio": "9:16" }))
            .times(1)
            .returning(|_| Ok(json!({ "success": true, "jobId": "abc123" })));
        let (app, state) = app(pipeline);
        let token = state.sessions.issue();

        let response = app
            .oneshot(request(
                "POST",
                "/api/generate",
                Some(&token),
                Some(r#"{"script":"hello world","aspectRatio":"9:16"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "jobId": "abc123" })
        );
    }

    #[tokio::test]
    async fn test_generate_relays_pipeline_failure_body_as_is() {
        let mut pipeline = MockPipelineClient::new();
        pipeline
            .expect_submit()
            .returning(|_| Ok(json!({ "success": false, "error": "script too long" })));
        let (app, state) = app(pipeline);
        let token = state.sessions.issue();

        let response = app
            .oneshot(request("POST", "/api/generate", Some(&token), Some(r#"{"script":"x"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "error": "script too long" })
        );
    }

    #[tokio::test]
    async fn test_generate_with_unreachable_pipeline_is_503() {
        let mut pipeline = MockPipelineClient::new();
        pipeline
            .expect_submit()
            .returning(|_| Err(PipelineError::Unreachable("connection refused".to_string())));
        let (app, state) = app(pipeline);
        let token = state.sessions.issue();

        let response = app
            .oneshot(request("POST", "/api/generate", Some(&token), Some(r#"{"script":"hello world"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Cannot connect to pipeline server"));
    }

    #[tokio::test]
    async fn test_generate_with_unreadable_body_skips_pipeline() {
        let mut pipeline = MockPipelineClient::new();
        pipeline.expect_submit().never();
        let (app, state) = app(pipeline);
        let token = state.sessions.issue();

        let response = app
            .oneshot(request("POST", "/api/generate", Some(&token), Some("{script")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_status_relays_pipeline_body() {
        let mut pipeline = MockPipelineClient::new();
        pipeline
            .expect_status()
            .withf(|job_id| job_id == "abc123")
            .times(1)
            .returning(|_| {
                Ok(json!({ "status": "complete", "videoUrl": "https://cdn.example.com/v.mp4" }))
            });
        let (app, state) = app(pipeline);
        let token = state.sessions.issue();

        let response = app
            .oneshot(request("GET", "/api/status/abc123", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "complete", "videoUrl": "https://cdn.example.com/v.mp4" })
        );
    }

    #[tokio::test]
    async fn test_status_with_unreachable_pipeline_is_503() {
        let mut pipeline = MockPipelineClient::new();
        pipeline
            .expect_status()
            .returning(|_| Err(PipelineError::Unreachable("timed out".to_string())));
        let (app, state) = app(pipeline);
        let token = state.sessions.issue();

        let response = app
            .oneshot(request("GET", "/api/status/abc123", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "error", "error": "Cannot connect to pipeline server" })
        );
    }

    #[tokio::test]
    async fn test_production_cookie_is_secure() {
        let mut config = AppConfig::default();
        config.app.env = "production".to_string();
        config.auth.session_secret = Some("s".to_string());
        let state = AppState::new(config, Arc::new(MockPipelineClient::new())).unwrap();

        let response = build_router(state)
            .oneshot(request("POST", "/api/auth", None, Some(r#"{"password":"demo123"}"#)))
            .await
            .unwrap();

        assert!(set_cookie(&response).unwrap().ends_with("; Secure"));
    }
}
