//! Integration tests for employee management.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers;

#[tokio::test]
async fn test_create_employee_returns_working_token() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/employee",
            Some(json!({
                "name": "Marta",
                "email": "marta@clientdesk.test",
                "password": "password123",
                "password_confirmation": "password123",
                "job_title": "Sales",
                "joined_at": "2024-03-01",
            })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"]["role"], "employee");
    assert_eq!(response.body["employee"]["job_title"], "Sales");

    let token = response.body["token"].as_str().expect("token").to_string();
    let me = app.request("GET", "/api/user", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "marta@clientdesk.test");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;
    app.create_employee(&admin, "dup@clientdesk.test").await;

    let response = app
        .request(
            "POST",
            "/api/employee",
            Some(json!({
                "name": "Other",
                "email": "dup@clientdesk.test",
                "password": "password123",
                "password_confirmation": "password123",
            })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["errors"]["email"][0],
        "The email has already been taken."
    );
}

#[tokio::test]
async fn test_password_confirmation_must_match() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/employee",
            Some(json!({
                "name": "Other",
                "email": "other@clientdesk.test",
                "password": "password123",
                "password_confirmation": "password124",
            })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["errors"].get("password").is_some());
}

#[tokio::test]
async fn test_update_and_delete_employee() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;
    let staff = app.create_employee(&admin, "staff@clientdesk.test").await;

    let list = app.request("GET", "/api/employee", None, Some(&admin)).await;
    assert_eq!(list.status, StatusCode::OK);
    let id = list.body["employees"][0]["id"].as_i64().expect("employee id");

    let response = app
        .request(
            "PUT",
            &format!("/api/employee/{id}"),
            Some(json!({ "job_title": "Manager" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["employee"]["job_title"], "Manager");
    assert_eq!(response.body["employee"]["user"]["email"], "staff@clientdesk.test");

    let response = app
        .request("DELETE", &format!("/api/employee/{id}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["message"],
        "Employee and associated user deleted successfully"
    );

    // The deleted user's session no longer authenticates
    let me = app.request("GET", "/api/user", None, Some(&staff)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", &format!("/api/employee/{id}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_password_requires_confirmation() {
    let app = helpers::TestApp::new().await;
    let admin = app.admin_token().await;
    app.create_employee(&admin, "pw@clientdesk.test").await;

    let list = app.request("GET", "/api/employee", None, Some(&admin)).await;
    let id = list.body["employees"][0]["id"].as_i64().expect("employee id");
    let path = format!("/api/employee/{id}");

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "password": "new-password-1" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["errors"].get("password").is_some());

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({
                "password": "new-password-1",
                "password_confirmation": "new-password-1",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    app.login("pw@clientdesk.test", "new-password-1").await;
}
