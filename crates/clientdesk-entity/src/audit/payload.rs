//! Change payload shapes stored on audit entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Old and new value of one field. Either side is `None` when the field
/// did not exist on that side of the change; an explicit JSON `null` is
/// `Some(Value::Null)` and survives storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Value before the change.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub old: Option<Value>,
    /// Value after the change.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub new: Option<Value>,
}

/// A key that is present keeps its value, `null` included.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FieldChange {
    /// A change from `old` to `new`.
    pub fn new(old: Option<Value>, new: Option<Value>) -> Self {
        Self { old, new }
    }
}

/// Field name to change, ordered by field name.
pub type ChangeSet = BTreeMap<String, FieldChange>;

/// The stored payload of an audit entry.
///
/// New entries are always written as `Unified`. `Legacy` rows carry
/// separate old/new blobs whose shape varies (see the audit reader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ChangePayload {
    /// One `{field: {old, new}}` map.
    Unified {
        /// Changed fields.
        changes: ChangeSet,
    },
    /// Separate old and new values as written by earlier releases.
    Legacy {
        /// Values before the change.
        old_values: Option<Value>,
        /// Values after the change.
        new_values: Option<Value>,
    },
}

impl ChangePayload {
    /// Rebuild a payload from the three storage columns. A non-null
    /// `changes` column wins; otherwise the row is legacy.
    pub fn from_columns(
        changes: Option<Value>,
        old_values: Option<Value>,
        new_values: Option<Value>,
    ) -> Result<Self, serde_json::Error> {
        match changes {
            Some(value) if !value.is_null() => Ok(Self::Unified {
                changes: serde_json::from_value(value)?,
            }),
            _ => Ok(Self::Legacy {
                old_values: old_values.filter(|v| !v.is_null()),
                new_values: new_values.filter(|v| !v.is_null()),
            }),
        }
    }
}
