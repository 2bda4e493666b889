//! Client address entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Country stored when an address is submitted without one.
pub const DEFAULT_COUNTRY: &str = "El Salvador";

/// A postal address owned by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Address {
    /// Unique address identifier.
    pub id: i64,
    /// Owning client.
    pub client_id: i64,
    /// Street line.
    pub address: String,
    /// Postal code, if known.
    pub postal_code: Option<String>,
    /// Country name.
    pub country: String,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
    /// When the address was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to attach an address to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddress {
    /// Street line.
    pub address: String,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country; [`DEFAULT_COUNTRY`] when absent.
    pub country: Option<String>,
}

impl NewAddress {
    /// The country that will be stored.
    pub fn country_or_default(&self) -> String {
        self.country
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string())
    }
}
