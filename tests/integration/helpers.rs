//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use clientdesk_api::{AppState, build_app};
use clientdesk_auth::password::PasswordHasher;
use clientdesk_core::config::{AppConfig, BootstrapConfig, DatabaseBackend};
use clientdesk_database::MemoryDatabase;

pub const ADMIN_EMAIL: &str = "admin@clientdesk.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
}

impl TestApp {
    /// Create a new test application on a fresh in-memory store with one admin.
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let db = Arc::new(MemoryDatabase::new());

        let bootstrap = BootstrapConfig {
            name: "Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        };
        clientdesk_service::bootstrap::seed_admin(db.as_ref(), &PasswordHasher::new(), &bootstrap)
            .await
            .expect("Failed to seed admin");

        let router = build_app(AppState::new(config, db));
        Self { router }
    }

    /// Login as the seeded admin and return the bearer token
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Create an employee through the API and return its login token
    pub async fn create_employee(&self, admin_token: &str, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/employee",
                Some(serde_json::json!({
                    "name": "Staff Member",
                    "email": email,
                    "password": "password123",
                    "password_confirmation": "password123",
                    "job_title": "Clerk",
                })),
                Some(admin_token),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Employee creation failed: {:?}",
            response.body
        );
        self.login(email, "password123").await
    }

    /// Login and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self.request("POST", "/api/login", Some(body), None).await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .body
            .get("token")
            .and_then(|v| v.as_str())
            .expect("No token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A valid client creation body.
pub fn client_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "lastName": "Lopez",
        "email": "ana@example.com",
        "phone": "7777-0000",
        "addresses": [
            { "address": "Calle 1", "postal_code": "1101" }
        ],
        "documents": [
            { "document_type": "DUI", "document_number": "01234567-8" }
        ],
    })
}
