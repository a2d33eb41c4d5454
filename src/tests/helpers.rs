use axum::{
    Router,
    body::Body,
    http::{HeaderMap, HeaderValue, Request, StatusCode, header::SET_COOKIE},
};
use cookie::Cookie;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::sync::Once;
use tower::ServiceExt;
use tracing::{Level, info};
use tracing_subscriber::fmt::format::FmtSpan;

use crate::{AppState, config::AuthConfig, create_router, models::user::User};

pub const TEST_COOKIE_NAME: &str = "jid";
pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

static INIT: Once = Once::new();

/// Initialize logging exactly once
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_target(false)
            .with_max_level(Level::ERROR)
            .with_span_events(FmtSpan::NONE)
            .init();
    });
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_ACCESS_SECRET, TEST_REFRESH_SECRET, TEST_COOKIE_NAME)
}

pub fn test_user(id: i64) -> User {
    User {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        password_hash: String::new(),
    }
}

pub async fn setup_test_db() -> SqlitePool {
    init_tracing();
    info!("Setting up test database");

    // A single, never-recycled connection keeps the in-memory database alive
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn create_test_app(pool: SqlitePool) -> Router {
    // bcrypt's minimum cost keeps hashing fast in tests
    let state = AppState::new(pool, test_auth_config(), 4);
    create_router(state, HeaderValue::from_static("http://localhost:3000"))
}

pub async fn test_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: Option<HeaderMap>,
) -> (StatusCode, String, HeaderMap) {
    info!(method = %method, uri = %uri, "Making test request");

    let body = match body {
        Some(json) => Body::from(serde_json::to_string(&json).unwrap()),
        None => Body::empty(),
    };

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(custom_headers) = headers {
        for (key, value) in custom_headers.iter() {
            request = request.header(key, value);
        }
    }

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = String::from_utf8(
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    info!(status = %status, body = %body, "Test response received");
    (status, body, headers)
}

/// All `Set-Cookie` headers of a response, parsed.
pub fn set_cookies(headers: &HeaderMap) -> Vec<Cookie<'static>> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| Cookie::parse(value.to_str().unwrap().to_string()).unwrap())
        .collect()
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("authorization", format!("Bearer {token}").parse().unwrap());
    headers
}

pub fn cookie_header(name: &str, value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("cookie", format!("{name}={value}").parse().unwrap());
    headers
}

/// Register a user, log in, and return the access token and refresh cookie value.
pub async fn register_and_login(app: &Router, email: &str, password: &str) -> (String, String) {
    let register_data = json!({
        "username": "testuser",
        "email": email,
        "password": password
    });
    let (status, _, _) = test_request(app.clone(), "POST", "/register", Some(register_data), None).await;
    assert_eq!(status, StatusCode::OK);

    let login_data = json!({ "email": email, "password": password });
    let (status, body, headers) = test_request(app.clone(), "POST", "/login", Some(login_data), None).await;
    assert_eq!(status, StatusCode::OK);

    let response: Value = serde_json::from_str(&body).unwrap();
    let access_token = response["accessToken"].as_str().unwrap().to_string();
    let refresh_token = set_cookies(&headers)
        .into_iter()
        .find(|c| c.name() == TEST_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .unwrap();

    (access_token, refresh_token)
}
