//! Request DTOs with validation.
//!
//! Required strings default to empty when missing so that a missing field
//! surfaces as a field-level validation message instead of a parse error.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use clientdesk_entity::client::{ClientChanges, DocumentType, NewAddress, NewClient, NewDocument};
use clientdesk_service::client::{ClientInput, ClientPatch};
use clientdesk_service::employee::{EmployeeInput, EmployeePatch};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[serde(default)]
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// One address inside a client payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressRequest {
    /// Street line.
    #[serde(default)]
    #[validate(length(min = 1, message = "The address field is required."))]
    pub address: String,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country; the store defaults it to El Salvador.
    pub country: Option<String>,
}

impl From<AddressRequest> for NewAddress {
    fn from(req: AddressRequest) -> Self {
        Self {
            address: req.address,
            postal_code: req.postal_code,
            country: req.country,
        }
    }
}

/// One identity document inside a client payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentRequest {
    /// One of `DUI`, `NIT`, `Pasaporte`, `Licencia`.
    #[serde(default)]
    #[validate(custom(function = "validate_document_type"))]
    pub document_type: String,
    /// Document number.
    #[serde(default)]
    #[validate(length(min = 1, message = "The document number field is required."))]
    pub document_number: String,
}

impl DocumentRequest {
    fn into_new_document(self) -> Option<NewDocument> {
        let document_type = DocumentType::from_str(&self.document_type).ok()?;
        Some(NewDocument {
            document_type,
            document_number: self.document_number,
        })
    }
}

fn validate_document_type(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required")
            .with_message("The document type field is required.".into()));
    }
    DocumentType::from_str(value).map(|_| ()).map_err(|_| {
        ValidationError::new("document_type")
            .with_message("The selected document type is invalid.".into())
    })
}

/// Create client request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClientRequest {
    /// Given name.
    #[serde(default)]
    #[validate(length(min = 1, message = "The name field is required."))]
    pub name: String,
    /// Family name.
    #[serde(rename = "lastName", default)]
    #[validate(length(min = 1, message = "The lastName field is required."))]
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    #[validate(length(min = 1, message = "The phone field is required."))]
    pub phone: String,
    /// Addresses to attach; at most four.
    #[validate(nested)]
    pub addresses: Option<Vec<AddressRequest>>,
    /// Documents to attach.
    #[validate(nested)]
    pub documents: Option<Vec<DocumentRequest>>,
}

impl CreateClientRequest {
    /// Converts a validated request into service input.
    pub fn into_input(self) -> ClientInput {
        ClientInput {
            client: NewClient {
                name: self.name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
            },
            addresses: self
                .addresses
                .unwrap_or_default()
                .into_iter()
                .map(NewAddress::from)
                .collect(),
            documents: self
                .documents
                .unwrap_or_default()
                .into_iter()
                .filter_map(DocumentRequest::into_new_document)
                .collect(),
        }
    }
}

/// Update client request. Absent fields are left untouched; a present
/// `addresses` or `documents` list replaces the stored one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateClientRequest {
    /// New given name.
    #[validate(length(min = 1, message = "The name field is required."))]
    pub name: Option<String>,
    /// New family name.
    #[serde(rename = "lastName")]
    #[validate(length(min = 1, message = "The lastName field is required."))]
    pub last_name: Option<String>,
    /// New email.
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: Option<String>,
    /// New phone.
    #[validate(length(min = 1, message = "The phone field is required."))]
    pub phone: Option<String>,
    /// Replacement addresses.
    #[validate(nested)]
    pub addresses: Option<Vec<AddressRequest>>,
    /// Replacement documents.
    #[validate(nested)]
    pub documents: Option<Vec<DocumentRequest>>,
}

impl UpdateClientRequest {
    /// Converts a validated request into a service patch.
    pub fn into_patch(self) -> ClientPatch {
        ClientPatch {
            changes: ClientChanges {
                name: self.name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
            },
            addresses: self
                .addresses
                .map(|list| list.into_iter().map(NewAddress::from).collect()),
            documents: self.documents.map(|list| {
                list.into_iter()
                    .filter_map(DocumentRequest::into_new_document)
                    .collect()
            }),
        }
    }
}

/// Report query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Restrict the report to one client.
    pub client_id: Option<i64>,
}

/// Create employee request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    /// Display name.
    #[serde(default)]
    #[validate(length(min = 1, message = "The name field is required."))]
    pub name: String,
    /// Login email.
    #[serde(default)]
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,
    /// Password; must match `password_confirmation`.
    #[serde(default)]
    #[validate(
        length(min = 8, message = "The password field must be at least 8 characters."),
        must_match(
            other = "password_confirmation",
            message = "The password field confirmation does not match."
        )
    )]
    pub password: String,
    /// Password repeated.
    #[serde(default)]
    pub password_confirmation: String,
    /// Job title.
    pub job_title: Option<String>,
    /// Date the employee joined.
    pub joined_at: Option<NaiveDate>,
}

impl CreateEmployeeRequest {
    /// Converts a validated request into service input.
    pub fn into_input(self) -> EmployeeInput {
        EmployeeInput {
            name: self.name,
            email: self.email,
            password: self.password,
            job_title: self.job_title,
            joined_at: self.joined_at,
        }
    }
}

/// Update employee request.
///
/// Every field is optional, so the rules only apply to the fields that are
/// present. A new password must come with a matching confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// New display name.
    pub name: Option<String>,
    /// New login email.
    pub email: Option<String>,
    /// New password; must match `password_confirmation`.
    pub password: Option<String>,
    /// Password repeated.
    pub password_confirmation: Option<String>,
    /// New job title.
    pub job_title: Option<String>,
    /// New join date.
    pub joined_at: Option<NaiveDate>,
}

impl Validate for UpdateEmployeeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.as_deref().is_some_and(str::is_empty) {
            errors.add("name", invalid("length", "The name field is required."));
        }
        if let Some(email) = &self.email {
            if !email.validate_email() {
                errors.add(
                    "email",
                    invalid("email", "The email field must be a valid email address."),
                );
            }
        }
        if let Some(password) = &self.password {
            if password.chars().count() < 8 {
                errors.add(
                    "password",
                    invalid("length", "The password field must be at least 8 characters."),
                );
            }
            if self.password_confirmation.as_ref() != Some(password) {
                errors.add(
                    "password",
                    invalid("must_match", "The password field confirmation does not match."),
                );
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

impl UpdateEmployeeRequest {
    /// Converts a validated request into a service patch.
    pub fn into_patch(self) -> EmployeePatch {
        EmployeePatch {
            name: self.name,
            email: self.email,
            password: self.password,
            job_title: self.job_title,
            joined_at: self.joined_at,
        }
    }
}
