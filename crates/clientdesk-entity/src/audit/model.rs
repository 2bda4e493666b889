//! Audit entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::action::AuditAction;
use super::payload::{ChangePayload, ChangeSet};

/// Raw `client_audits` row joined with the actor's display name.
#[derive(Debug, Clone, FromRow)]
pub struct AuditRecord {
    /// Unique audit entry identifier.
    pub id: i64,
    /// Audited client.
    pub client_id: i64,
    /// Acting user, if known.
    pub user_id: Option<i64>,
    /// Acting user's display name, if the user still exists.
    pub user_name: Option<String>,
    /// Stored action name (current or legacy spelling).
    pub action: String,
    /// Unified change map.
    pub changes: Option<Value>,
    /// Legacy old values.
    pub old_values: Option<Value>,
    /// Legacy new values.
    pub new_values: Option<Value>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// An immutable record of one change event on a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique audit entry identifier.
    pub id: i64,
    /// Audited client.
    pub client_id: i64,
    /// Acting user, if known.
    pub user_id: Option<i64>,
    /// Acting user's display name.
    pub user_name: Option<String>,
    /// What happened.
    pub action: AuditAction,
    /// What changed.
    pub payload: ChangePayload,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuditRecord> for AuditEntry {
    type Error = clientdesk_core::AppError;

    fn try_from(record: AuditRecord) -> Result<Self, Self::Error> {
        let action = record.action.parse::<AuditAction>()?;
        let payload =
            ChangePayload::from_columns(record.changes, record.old_values, record.new_values)?;
        Ok(Self {
            id: record.id,
            client_id: record.client_id,
            user_id: record.user_id,
            user_name: record.user_name,
            action,
            payload,
            created_at: record.created_at,
        })
    }
}

/// Data required to write a new audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    /// Audited client.
    pub client_id: i64,
    /// Acting user.
    pub user_id: Option<i64>,
    /// What happened.
    pub action: AuditAction,
    /// What changed.
    pub changes: ChangeSet,
}
