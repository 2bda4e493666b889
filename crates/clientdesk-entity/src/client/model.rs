//! Client entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::address::Address;
use super::document::Document;

/// A client record.
///
/// Field names on the wire follow the public API (`lastName`), and audit
/// change maps use the same keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Client {
    /// Unique client identifier.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Family name.
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// `false` once the client has been deactivated.
    pub is_active: bool,
    /// When the client was created.
    pub created_at: DateTime<Utc>,
    /// When the client was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Flat map of every persisted scalar field, keyed by wire name.
    pub fn snapshot(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Apply a field patch in place. Absent fields are left untouched.
    pub fn apply(&mut self, changes: &ClientChanges) {
        if let Some(name) = &changes.name {
            self.name.clone_from(name);
        }
        if let Some(last_name) = &changes.last_name {
            self.last_name.clone_from(last_name);
        }
        if let Some(email) = &changes.email {
            self.email.clone_from(email);
        }
        if let Some(phone) = &changes.phone {
            self.phone.clone_from(phone);
        }
    }
}

/// A client together with its addresses and documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientWithRelations {
    /// The client row.
    #[serde(flatten)]
    pub client: Client,
    /// Attached addresses, in insertion order.
    pub addresses: Vec<Address>,
    /// Attached documents, in insertion order.
    pub documents: Vec<Document>,
}

/// Data required to create a new client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    /// Given name.
    pub name: String,
    /// Family name.
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
}

/// A partial update to a client's scalar fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientChanges {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New family name.
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ClientChanges {
    /// The submitted fields as a flat map. Only present fields appear.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        let now = Utc::now();
        Client {
            id: 7,
            name: "Ana".into(),
            last_name: "Lopez".into(),
            email: "ana@x.com".into(),
            phone: "71234567".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_snapshot_uses_wire_names() {
        let snapshot = client().snapshot();
        assert_eq!(snapshot.get("lastName"), Some(&Value::from("Lopez")));
        assert_eq!(snapshot.get("is_active"), Some(&Value::Bool(true)));
        assert!(!snapshot.contains_key("last_name"));
    }

    #[test]
    fn test_changes_map_only_lists_present_fields() {
        let changes = ClientChanges {
            name: Some("Anna".into()),
            ..Default::default()
        };
        let map = changes.to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("name"), Some(&Value::from("Anna")));
    }

    #[test]
    fn test_apply_leaves_absent_fields() {
        let mut c = client();
        c.apply(&ClientChanges {
            phone: Some("70000000".into()),
            ..Default::default()
        });
        assert_eq!(c.phone, "70000000");
        assert_eq!(c.name, "Ana");
    }
}
