//! End-to-end tests through the full router over the in-memory store.

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};

use crate::{
    api::models::{
        admin::AdminResponse,
        auth::AuthResponse,
        users::{Role, UserResponse},
    },
    errors::ErrorResponse,
    test_utils::{create_test_server, session_cookie_from},
};

async fn signup(server: &TestServer, body: Value) -> UserResponse {
    let response = server.post("/auth/signup").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<AuthResponse>().user
}

/// Log in and return the `Cookie` header a browser would send afterwards
async fn login(server: &TestServer, body: Value) -> (axum::http::HeaderName, HeaderValue) {
    let response = server.post("/auth/login").json(&body).await;
    response.assert_status_ok();
    session_cookie_from(&response)
}

#[test_log::test(tokio::test)]
async fn test_first_signup_becomes_admin_then_users() {
    let server = create_test_server();

    let first = signup(&server, json!({"name": "root", "email": "root@example.com"})).await;
    assert_eq!(first.role, Role::Admin);
    assert_eq!(first.name, "root");
    assert_eq!(first.email.as_deref(), Some("root@example.com"));

    let second = signup(&server, json!({"name": "mallory", "role": "ADMIN"})).await;
    assert_eq!(second.role, Role::User);

    let third = signup(&server, json!({"name": "trent", "role": "USER"})).await;
    assert_eq!(third.role, Role::User);
}

#[test_log::test(tokio::test)]
async fn test_first_signup_may_choose_user_role() {
    let server = create_test_server();

    let first = signup(&server, json!({"name": "humble", "role": "USER"})).await;
    assert_eq!(first.role, Role::User);

    // The system is no longer empty, so nobody can claim ADMIN any more
    let second = signup(&server, json!({"name": "late", "role": "ADMIN"})).await;
    assert_eq!(second.role, Role::User);
}

#[test_log::test(tokio::test)]
async fn test_duplicate_signups_conflict() {
    let server = create_test_server();

    signup(&server, json!({"name": "alice", "email": "alice@example.com"})).await;

    let response = server
        .post("/auth/signup")
        .json(&json!({"name": "someone else", "email": "alice@example.com"}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Conflict");

    // Without an email the name is the identity
    signup(&server, json!({"name": "bob"})).await;
    let response = server.post("/auth/signup").json(&json!({"name": "bob"})).await;
    response.assert_status(StatusCode::CONFLICT);

    // The rejected signup created nothing, so bob still resolves
    let cookie = login(&server, json!({"name": "bob"})).await;
    let me: AuthResponse = server.get("/auth/me").add_header(cookie.0, cookie.1).await.json();
    assert_eq!(me.user.name, "bob");
}

#[test_log::test(tokio::test)]
async fn test_signup_with_invalid_json_is_invalid_input() {
    let server = create_test_server();

    let response = server
        .post("/auth/signup")
        .content_type("application/json")
        .text("{not json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "InvalidInput");

    let response = server.post("/auth/signup").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_login_resolves_to_same_user() {
    let server = create_test_server();
    let created = signup(&server, json!({"name": "carol", "email": "carol@example.com"})).await;

    let (name, value) = login(&server, json!({"email": "carol@example.com"})).await;
    let me: AuthResponse = server.get("/auth/me").add_header(name, value).await.json();
    assert_eq!(me.user.id, created.id);
}

#[test_log::test(tokio::test)]
async fn test_login_by_email_wins_over_name() {
    let server = create_test_server();
    signup(&server, json!({"name": "dave"})).await;
    let other = signup(&server, json!({"name": "erin", "email": "erin@example.com"})).await;

    let (name, value) = login(&server, json!({"name": "dave", "email": "erin@example.com"})).await;
    let me: AuthResponse = server.get("/auth/me").add_header(name, value).await.json();
    assert_eq!(me.user.id, other.id);
}

#[test_log::test(tokio::test)]
async fn test_failed_login_leaves_no_session() {
    let server = create_test_server();
    signup(&server, json!({"name": "frank"})).await;

    // A browser already holding a valid session
    let (name, value) = login(&server, json!({"name": "frank"})).await;
    server.get("/admin").add_header(name.clone(), value).await.assert_status_ok();

    let response = server.post("/auth/login").json(&json!({"email": "nobody@example.com"})).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "InvalidCredentials");

    // The browser applies the clearing cookie and is logged out
    let (name, value) = session_cookie_from(&response);
    let response = server.get("/admin").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Unauthenticated");
}

#[test_log::test(tokio::test)]
async fn test_admin_requires_login() {
    let server = create_test_server();

    let response = server.get("/admin").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Unauthenticated");
    assert_eq!(body.message, "You must be logged in to access this resource.");

    server.get("/auth/me").await.assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_admin_forbidden_for_standard_user() {
    let server = create_test_server();
    signup(&server, json!({"name": "admin"})).await;
    signup(&server, json!({"name": "grace"})).await;

    let (name, value) = login(&server, json!({"name": "grace"})).await;
    let response = server.get("/admin").add_header(name, value).await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: ErrorResponse = response.json();
    assert_eq!(body.error, "Forbidden");
    assert_eq!(body.message, "You must be an admin to access this resource.");
}

#[test_log::test(tokio::test)]
async fn test_admin_succeeds_and_reads_are_idempotent() {
    let server = create_test_server();
    let admin = signup(&server, json!({"name": "heidi", "email": "heidi@example.com"})).await;

    let (name, value) = login(&server, json!({"email": "heidi@example.com"})).await;

    let first = server.get("/admin").add_header(name.clone(), value.clone()).await;
    first.assert_status_ok();
    assert!(first.headers().get(header::SET_COOKIE).is_none());

    let raw: Value = first.json();
    assert_eq!(raw["message"], "Welcome to the admin API.");
    assert_eq!(raw["currentUser"]["role"], "ADMIN");
    assert_eq!(raw["exampleAdminData"]["systemStatus"], "ok");

    let body: AdminResponse = first.json();
    assert_eq!(body.current_user.id, admin.id);

    let second: Value = server.get("/admin").add_header(name, value).await.json();
    assert_eq!(second, raw);
}

#[test_log::test(tokio::test)]
async fn test_tampered_cookie_is_rejected() {
    let server = create_test_server();
    let admin = signup(&server, json!({"name": "ivan"})).await;

    // The bare user id is not a session
    let forged = HeaderValue::from_str(&format!("demo_session_user_id={}", admin.id)).unwrap();
    server
        .get("/admin")
        .add_header(header::COOKIE, forged)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = login(&server, json!({"name": "ivan"})).await;
    let tampered = value.to_str().unwrap().replacen('=', "=0", 1);
    server
        .get("/admin")
        .add_header(name, HeaderValue::from_str(&tampered).unwrap())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_logout_ends_session() {
    let server = create_test_server();
    signup(&server, json!({"name": "judy"})).await;
    login(&server, json!({"name": "judy"})).await;

    let response = server.post("/auth/logout").await;
    response.assert_status_ok();

    let (name, value) = session_cookie_from(&response);
    assert_eq!(value, "demo_session_user_id=");
    server
        .get("/auth/me")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_healthz_and_docs() {
    let server = create_test_server();

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("OK");

    let doc: Value = server.get("/openapi.json").await.json();
    assert!(doc["paths"]["/auth/signup"].is_object());
    assert!(doc["paths"]["/admin"].is_object());

    server.get("/docs").await.assert_status_ok();
}

#[test_log::test(tokio::test)]
async fn test_application_serves_in_memory_by_default() {
    let app = crate::Application::new(crate::test_utils::create_test_config()).await.unwrap();
    let server = app.into_test_server();

    let response = server.post("/auth/signup").json(&json!({"name": "kim"})).await;
    response.assert_status(StatusCode::CREATED);
}
