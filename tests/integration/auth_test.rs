//! Integration tests for the login flow.

use axum::http::StatusCode;

use crate::helpers::{self, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn test_login_success() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({
                "email": ADMIN_EMAIL,
                "password": ADMIN_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("token").is_some());
    assert_eq!(response.body["role"], "admin");
    assert_eq!(response.body["user"]["email"], ADMIN_EMAIL);
    assert!(response.body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({
                "email": ADMIN_EMAIL,
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/api/login", Some(serde_json::json!({})), None)
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["errors"].get("email").is_some());
}

#[tokio::test]
async fn test_current_user() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app.request("GET", "/api/user", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn test_current_user_unauthenticated() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/user", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app.request("POST", "/api/logout", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    // Token should now be invalid
    let response = app.request("GET", "/api/user", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["backend"], "memory");
}
