#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use civic_api::auth::session::{SessionConfig, SESSION_COOKIE};
use civic_api::config::ServerConfig;
use civic_api::router::build_app_router;
use civic_api::seed::ensure_seed_data;
use civic_api::state::AppState;
use civic_core::contract::Endpoint;
use civic_db::{MemoryStore, Store};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        database_url: None,
        db_max_connections: 1,
        seed_demo_data: false,
        session: SessionConfig::default(),
    }
}

/// Build the full application router over the given store, with the same
/// middleware stack production uses.
pub fn build_test_app(store: Arc<dyn Store>) -> Router {
    let config = test_config();
    build_app_router(AppState::new(store, config.clone()), &config)
}

/// An app over an empty in-memory store.
pub fn empty_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (build_test_app(store.clone()), store)
}

/// An app over an in-memory store holding the demo admin, the demo citizen
/// and their two sample issues.
pub async fn seeded_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    ensure_seed_data(store.as_ref())
        .await
        .expect("seeding should succeed");
    (build_test_app(store.clone()), store)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    send(app, Method::GET, uri, None, cookie).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value, cookie: Option<&str>) -> Response {
    send(app, Method::POST, uri, Some(body), cookie).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value, cookie: Option<&str>) -> Response {
    send(app, Method::PUT, uri, Some(body), cookie).await
}

pub async fn delete(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    send(app, Method::DELETE, uri, None, cookie).await
}

/// POST a raw, possibly malformed, JSON body.
pub async fn post_raw(app: &Router, uri: &str, raw: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(raw.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// The `Set-Cookie` header of a response, if any.
pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Turn a `Set-Cookie` header into the `Cookie` header a browser would send.
pub fn cookie_pair(set_cookie: &str) -> String {
    let pair = set_cookie.split(';').next().unwrap().trim().to_string();
    assert!(pair.starts_with(&format!("{SESSION_COOKIE}=")));
    pair
}

// ---------------------------------------------------------------------------
// Auth helpers
// ---------------------------------------------------------------------------

/// Log in through the API and return the cookie to send on later requests.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/login", body, None).await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    cookie_pair(&set_cookie(&response).expect("login should set a cookie"))
}

/// Register a citizen through the API and return `(user json, cookie)`.
pub async fn register(app: &Router, username: &str, password: &str, name: &str) -> (Value, String) {
    let body = serde_json::json!({ "username": username, "password": password, "name": name });
    let response = post_json(app, "/api/register", body, None).await;
    assert_eq!(response.status(), StatusCode::CREATED, "register {username}");
    let cookie = cookie_pair(&set_cookie(&response).expect("register should set a cookie"));
    (body_json(response).await, cookie)
}

/// Create an issue as the given session and return its JSON.
pub async fn create_issue(app: &Router, cookie: &str, title: &str) -> Value {
    let body = serde_json::json!({
        "title": title,
        "description": "Reported in a test",
        "category": "Road",
        "location": "5th Ave",
    });
    let response = post_json(app, Endpoint::CreateIssue.path(), body, Some(cookie)).await;
    assert_eq!(
        response.status().as_u16(),
        Endpoint::CreateIssue.success_status()
    );
    body_json(response).await
}
