//! Integration tests for sign-in and the protected routes.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{DEMO_EMAIL, TestApp};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["backend"]["provider"], "memory");
    assert_eq!(response.body["data"]["signed_in"], false);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], DEMO_EMAIL);
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": DEMO_EMAIL, "password": "wrong" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_rejects_malformed_email() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "not-an-email", "password": "x" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    for path in ["/api/orders", "/api/screens", "/api/dashboard", "/api/auth/me"] {
        let response = app.request("GET", path, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path}");
    }

    let response = app
        .request("GET", "/api/orders", None, Some("garbage"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_session() {
    let app = TestApp::new().await;
    app.login().await;

    let response = app.request("POST", "/api/auth/refresh", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let token = response.body["data"]["access_token"]
        .as_str()
        .expect("access token");
    let me = app.request("GET", "/api/auth/me", None, Some(token)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_without_session_fails() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/api/auth/refresh", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_magic_link_request() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/magic-link",
            Some(json!({ "email": DEMO_EMAIL })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}
