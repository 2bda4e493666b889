//! Response DTOs.

use serde::{Deserialize, Serialize};

use clientdesk_entity::client::ClientWithRelations;
use clientdesk_entity::employee::{Employee, EmployeeWithUser};
use clientdesk_entity::user::{User, UserRole};
use clientdesk_service::AuditView;

/// Body carrying only a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The authenticated user.
    pub user: User,
    /// The user's role.
    pub role: UserRole,
    /// Bearer token.
    pub token: String,
}

/// `GET /client`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientListResponse {
    /// Every client with nested rows.
    pub clients: Vec<ClientWithRelations>,
}

/// `GET /client/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientResponse {
    /// The client with nested rows.
    pub client: ClientWithRelations,
}

/// Create and update results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessageResponse {
    /// Human-readable message.
    pub message: String,
    /// The client after the change.
    pub client: ClientWithRelations,
}

/// `GET /client/{id}/logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientLogsResponse {
    /// The audited client.
    pub client_id: i64,
    /// Entries, oldest first.
    pub logs: Vec<AuditView>,
}

/// `GET /employee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeListResponse {
    /// Every employee with its user.
    pub employees: Vec<EmployeeWithUser>,
}

/// `GET /employee/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    /// The employee with its user.
    pub employee: EmployeeWithUser,
}

/// `POST /employee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreatedResponse {
    /// Human-readable message.
    pub message: String,
    /// The employee row.
    pub employee: Employee,
    /// The linked user.
    pub user: User,
    /// Bearer token for the new user.
    pub token: String,
}

/// `PUT /employee/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeMessageResponse {
    /// Human-readable message.
    pub message: String,
    /// The employee after the change.
    pub employee: EmployeeWithUser,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store backend name.
    pub backend: String,
    /// `connected` or `unavailable`.
    pub database: String,
}
