//! Client identity document entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Kinds of identity document accepted for a client.
///
/// Wire and storage values are the labels used by existing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_type")]
pub enum DocumentType {
    /// National identity card.
    #[serde(rename = "DUI")]
    #[sqlx(rename = "DUI")]
    NationalId,
    /// Tax identification number.
    #[serde(rename = "NIT")]
    #[sqlx(rename = "NIT")]
    TaxId,
    /// Passport.
    #[serde(rename = "Pasaporte")]
    #[sqlx(rename = "Pasaporte")]
    Passport,
    /// Driver's license.
    #[serde(rename = "Licencia")]
    #[sqlx(rename = "Licencia")]
    DriversLicense,
}

impl DocumentType {
    /// All accepted document types.
    pub const ALL: [DocumentType; 4] = [
        Self::NationalId,
        Self::TaxId,
        Self::Passport,
        Self::DriversLicense,
    ];

    /// Return the stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NationalId => "DUI",
            Self::TaxId => "NIT",
            Self::Passport => "Pasaporte",
            Self::DriversLicense => "Licencia",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = clientdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                clientdesk_core::AppError::validation(format!(
                    "Invalid document type: '{s}'. Expected one of: DUI, NIT, Pasaporte, Licencia"
                ))
            })
    }
}

/// An identity document owned by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: i64,
    /// Owning client.
    pub client_id: i64,
    /// Kind of document.
    pub document_type: DocumentType,
    /// Document number as printed.
    pub document_number: String,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to attach a document to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    /// Kind of document.
    pub document_type: DocumentType,
    /// Document number.
    pub document_number: String,
}
