//! Shared helpers for tests.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, header};
use axum_test::{TestResponse, TestServer};

use crate::{AppState, build_router, config::Config, db::store::InMemoryUserStore};

pub fn create_test_config() -> Config {
    Config {
        secret_key: Some("test-secret-key-0123456789".to_string()),
        ..Default::default()
    }
}

/// App state over a fresh in-memory store
pub fn create_test_state() -> AppState {
    AppState::builder()
        .users(Arc::new(InMemoryUserStore::new()))
        .config(create_test_config())
        .build()
}

/// Full router (routes, CORS, tracing) over a fresh in-memory store
pub fn create_test_server() -> TestServer {
    let router = build_router(create_test_state()).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

/// The `name=value` pair from a response's `Set-Cookie` header, as a `Cookie` request header
pub fn session_cookie_from(response: &TestResponse) -> (HeaderName, HeaderValue) {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .expect("Set-Cookie should be ASCII");
    let pair = set_cookie.split(';').next().unwrap_or_default().trim();

    (header::COOKIE, HeaderValue::from_str(pair).expect("cookie pair is a valid header value"))
}
