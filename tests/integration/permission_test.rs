//! Integration tests for role gating.

use axum::http::StatusCode;

use crate::helpers::{self, client_body};

#[tokio::test]
async fn test_client_routes_require_token() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/client", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/client", None, Some("not-a-token"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_employee_can_manage_clients() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;
    let staff = app.create_employee(&admin, "clerk@clientdesk.test").await;

    let response = app
        .request("POST", "/api/client", Some(client_body("Ana")), Some(&staff))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.request("GET", "/api/client", None, Some(&staff)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["clients"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_employee_cannot_manage_employees() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;
    let staff = app.create_employee(&admin, "clerk@clientdesk.test").await;

    let response = app.request("GET", "/api/employee", None, Some(&staff)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "This action is unauthorized.");
}

#[tokio::test]
async fn test_admin_can_list_employees() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app.request("GET", "/api/employee", None, Some(&admin)).await;

    assert_eq!(response.status, StatusCode::OK);
}
