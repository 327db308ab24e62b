//! Shared helpers for the console integration tests.
//!
//! Each test binary compiles its own copy, so not every helper is used by
//! every binary.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use mktlab_console::backend::BackendClient;
use mktlab_console::config::ConsoleConfig;
use mktlab_console::routes;
use mktlab_console::sessions::SessionStore;
use mktlab_console::state::AppState;

/// Password the stub backend accepts.
pub const STUB_PASSWORD: &str = "Test123!";

/// Build a test `ConsoleConfig` pointing at the given backend URL.
pub fn test_config(backend_url: &str) -> ConsoleConfig {
    ConsoleConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        backend_url: backend_url.trim_end_matches('/').to_string(),
        backend_timeout_secs: 2,
        test_command: vec!["pytest".to_string(), "-q".to_string()],
        repo_root: PathBuf::from("."),
        test_timeout_secs: 30,
    }
}

/// Build the console app against the given config.
///
/// Middleware layers are exercised by the binary; these tests target the
/// route/handler/extractor stack, which is where the behaviour under test
/// lives.
pub fn build_test_app(config: ConsoleConfig) -> Router {
    let backend = Arc::new(BackendClient::new(
        config.backend_url.clone(),
        Duration::from_secs(config.backend_timeout_secs),
    ));
    let state = AppState {
        config: Arc::new(config),
        sessions: SessionStore::new(),
        backend,
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::api_routes())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// GET `uri` against the app.
pub async fn get_uri(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET `uri` with a session cookie.
pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body to `uri`.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with an empty body and no cookie.
pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with an empty body and a session cookie.
pub async fn post_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract the `name=value` pair of the session cookie from a response.
pub fn session_cookie(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response must set the session cookie")
        .to_str()
        .unwrap();
    header
        .split(';')
        .next()
        .expect("set-cookie must carry a pair")
        .to_string()
}

/// Log in through the console with the stub password and return the
/// session cookie pair.
pub async fn login_session(app: Router, email: &str) -> String {
    let body = json!({ "email": email, "password": STUB_PASSWORD });
    let response = post_json(app, "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

// ---------------------------------------------------------------------------
// Stub backend
// ---------------------------------------------------------------------------

/// Spawn a stub MKT Lab backend on an ephemeral port and return its base URL.
///
/// `POST /auth/login` answers with `login_response` for [`STUB_PASSWORD`]
/// and 401 otherwise; `GET /users` answers with a canned list when the
/// request carries a Bearer token and 401 otherwise.
pub async fn spawn_stub_backend(login_response: Value) -> String {
    let canned = Arc::new(login_response);

    let app = Router::new()
        .route(
            "/auth/login",
            post({
                let canned = Arc::clone(&canned);
                move |Json(body): Json<Value>| {
                    let canned = Arc::clone(&canned);
                    async move {
                        let password = body
                            .get("password")
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        if password == STUB_PASSWORD {
                            (StatusCode::OK, Json((*canned).clone()))
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({ "detail": "Credenciales inválidas" })),
                            )
                        }
                    }
                }
            }),
        )
        .route(
            "/users",
            get(|headers: axum::http::HeaderMap| async move {
                let authed = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v.starts_with("Bearer "));
                if authed {
                    (
                        StatusCode::OK,
                        Json(json!({ "data": [{ "email": "a@b.com" }] })),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "detail": "Not authenticated" })),
                    )
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub backend must bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}
