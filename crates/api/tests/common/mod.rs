//! Shared helpers for API integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router
//! without binding a TCP socket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use yogaflow_api::auth::jwt::{generate_access_token, JwtConfig};
use yogaflow_api::coalesce::CompletionGuard;
use yogaflow_api::config::ServerConfig;
use yogaflow_api::router::build_app_router;
use yogaflow_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        guidelines_path: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// No LLM client is configured, so generation endpoints always run the
/// rule-based assembler.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let guidelines = yogaflow_core::guidelines::load(None).expect("built-in guidelines load");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        llm: None,
        guidelines: Arc::new(guidelines),
        completions: Arc::new(CompletionGuard::default()),
    };

    build_app_router(state, &config)
}

/// Generate a signed access token for `user_id` using the test secret.
pub fn access_token(user_id: i64) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(method: Method, uri: &str, body: Body, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(body).unwrap()
}

/// Send a GET request with no auth header.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(request(Method::GET, uri, Body::empty(), None))
        .await
        .unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(request(Method::GET, uri, Body::empty(), Some(token)))
        .await
        .unwrap()
}

/// Send a POST request with a JSON body and no auth header.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(request(Method::POST, uri, Body::from(body.to_string()), None))
        .await
        .unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    app.oneshot(request(
        Method::POST,
        uri,
        Body::from(body.to_string()),
        Some(token),
    ))
    .await
    .unwrap()
}

/// Send a PATCH request with a JSON body and no auth header.
pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(request(
        Method::PATCH,
        uri,
        Body::from(body.to_string()),
        None,
    ))
    .await
    .unwrap()
}

/// Send a DELETE request with no auth header.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(request(Method::DELETE, uri, Body::empty(), None))
        .await
        .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body was not JSON: {e}: {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Assert the status and return the parsed body.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
