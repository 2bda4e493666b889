//! Integration tests for client records and their audit history.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::helpers::{self, client_body};

async fn create_client(app: &helpers::TestApp, token: &str, name: &str) -> i64 {
    let response = app
        .request("POST", "/api/client", Some(client_body(name)), Some(token))
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Client creation failed: {:?}",
        response.body
    );
    response.body["client"]["id"]
        .as_i64()
        .expect("No client id in response")
}

#[tokio::test]
async fn test_create_client_with_nested_rows() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request("POST", "/api/client", Some(client_body("Ana")), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Client created successfully");
    let client = &response.body["client"];
    assert_eq!(client["name"], "Ana");
    assert_eq!(client["lastName"], "Lopez");
    assert_eq!(client["is_active"], true);
    assert_eq!(client["addresses"][0]["country"], "El Salvador");
    assert_eq!(client["documents"][0]["document_type"], "DUI");
}

#[tokio::test]
async fn test_update_records_only_changed_fields() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;
    let id = create_client(&app, &token, "Ana").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/client/{id}"),
            Some(json!({ "name": "Anna", "email": "ana@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["client"]["name"], "Anna");

    let logs = app
        .request("GET", &format!("/api/client/{id}/logs"), None, Some(&token))
        .await;
    assert_eq!(logs.status, StatusCode::OK);

    let entries = logs.body["logs"].as_array().expect("logs array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "create");
    assert_eq!(entries[1]["action"], "update");
    assert_eq!(entries[1]["user_name"], "Admin");
    assert_eq!(
        entries[1]["changes"],
        json!({ "name": { "old": "Ana", "new": "Anna" } })
    );
    assert_eq!(entries[1]["old_values"], json!({ "name": "Ana" }));
    assert_eq!(entries[1]["new_values"], json!({ "name": "Anna" }));
}

#[tokio::test]
async fn test_unchanged_update_writes_no_audit() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;
    let id = create_client(&app, &token, "Ana").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/client/{id}"),
            Some(json!({ "name": "Ana" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let logs = app
        .request("GET", &format!("/api/client/{id}/logs"), None, Some(&token))
        .await;
    assert_eq!(logs.body["logs"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_deactivate_twice_conflicts() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;
    let id = create_client(&app, &token, "Ana").await;
    let path = format!("/api/client/{id}");

    let response = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Client deactivated successfully");

    let response = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(response.body["client"]["is_active"], false);
    assert_eq!(response.body["client"]["addresses"], json!([]));

    let response = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let logs = app
        .request("GET", &format!("{path}/logs"), None, Some(&token))
        .await;
    let entries = logs.body["logs"].as_array().expect("logs array");
    let last = entries.last().expect("deactivate entry");
    assert_eq!(last["action"], "deactivate");
    assert_eq!(last["changes"]["is_active"]["new"], false);
}

#[tokio::test]
async fn test_nested_validation_errors_are_indexed() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let mut body = client_body("Ana");
    body["addresses"] = json!([{ "address": "" }]);
    body["documents"] = json!([{ "document_type": "Cedula", "document_number": "1" }]);

    let response = app
        .request("POST", "/api/client", Some(body), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    let errors = &response.body["errors"];
    assert!(errors.get("addresses.0.address").is_some());
    assert!(errors.get("documents.0.document_type").is_some());
}

#[tokio::test]
async fn test_too_many_addresses_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let mut body = client_body("Ana");
    body["addresses"] = Value::Array(
        (0..5)
            .map(|i| json!({ "address": format!("Calle {i}") }))
            .collect(),
    );

    let response = app
        .request("POST", "/api/client", Some(body), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["errors"].get("addresses").is_some());
}

#[tokio::test]
async fn test_unknown_client_is_not_found() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request("GET", "/api/client/999", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/api/client/abc", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_flattens_clients() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;
    let id = create_client(&app, &token, "Ana").await;
    create_client(&app, &token, "Luis").await;

    let response = app
        .request("GET", "/api/client/report", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["columns"][0], "Client ID");
    assert_eq!(response.body["rows"].as_array().map(Vec::len), Some(2));

    let response = app
        .request(
            "GET",
            &format!("/api/client/report?client_id={id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rows"].as_array().map(Vec::len), Some(1));
    assert_eq!(response.body["rows"][0][1], "Ana");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let mut body = client_body("Ana");
    body["name"] = Value::String("x".repeat(2 * 1024 * 1024));
    let payload = serde_json::to_vec(&body).unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/client")
        .header("Content-Type", "application/json")
        .header("Content-Length", payload.len())
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(payload))
        .unwrap();

    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let list = app.request("GET", "/api/client", None, Some(&token)).await;
    assert_eq!(list.body["clients"], json!([]));
}
