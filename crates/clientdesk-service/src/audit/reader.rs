//! Audit history retrieval and payload normalization.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use clientdesk_auth::rbac::{RbacEnforcer, SystemPermission};
use clientdesk_core::error::AppError;
use clientdesk_core::result::AppResult;
use clientdesk_database::store::{AuditRepository, ClientRepository, Database};
use clientdesk_entity::audit::{AuditAction, AuditEntry, ChangePayload, ChangeSet, FieldChange};

use crate::context::RequestContext;

/// One audit entry in its display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditView {
    /// Audit entry ID.
    pub id: i64,
    /// Audited client.
    pub client_id: i64,
    /// Acting user, if known.
    pub user_id: Option<i64>,
    /// Acting user's display name; `None` for unknown or deleted users.
    pub user_name: Option<String>,
    /// What happened.
    pub action: AuditAction,
    /// Changed fields, whatever shape the entry was stored in.
    pub changes: ChangeSet,
    /// Flat map of old values, derived from `changes`.
    pub old_values: Option<Map<String, Value>>,
    /// Flat map of new values, derived from `changes`.
    pub new_values: Option<Map<String, Value>>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntry> for AuditView {
    fn from(entry: AuditEntry) -> Self {
        let changes = normalize(&entry.payload);
        let old_values = side(&changes, |c| c.old.as_ref());
        let new_values = side(&changes, |c| c.new.as_ref());
        Self {
            id: entry.id,
            client_id: entry.client_id,
            user_id: entry.user_id,
            user_name: entry.user_name,
            action: entry.action,
            changes,
            old_values,
            new_values,
            created_at: entry.created_at,
        }
    }
}

/// Convert any stored payload into one `field -> {old, new}` map.
///
/// Legacy blobs may be JSON text instead of JSON, and each side may be an
/// object or a list of single-key objects. When both sides are lists they
/// are paired by position. Everything else is merged by key. Values that
/// are neither objects nor lists contribute nothing.
pub fn normalize(payload: &ChangePayload) -> ChangeSet {
    match payload {
        ChangePayload::Unified { changes } => changes.clone(),
        ChangePayload::Legacy {
            old_values,
            new_values,
        } => {
            let old = old_values.as_ref().map(decode_text);
            let new = new_values.as_ref().map(decode_text);
            match (old, new) {
                (Some(Value::Array(old)), Some(Value::Array(new))) => pair_by_position(&old, &new),
                (old, new) => merge_by_key(old.as_ref(), new.as_ref()),
            }
        }
    }
}

/// Parse a string that holds encoded JSON; return other values unchanged.
fn decode_text(value: &Value) -> Value {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ (Value::Array(_) | Value::Object(_))) => parsed,
            _ => value.clone(),
        },
        other => other.clone(),
    }
}

/// Every `(field, value)` pair held by an object or a list of objects.
fn entries(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::Array(items) => items
            .iter()
            .map(decode_text)
            .flat_map(|item| match item {
                Value::Object(map) => map.into_iter().collect::<Vec<_>>(),
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn pair_by_position(old: &[Value], new: &[Value]) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for i in 0..old.len().max(new.len()) {
        let old_entry = old.get(i).map(entries).unwrap_or_default();
        let new_entry = new.get(i).map(entries).unwrap_or_default();

        // Single-key pairs name the same field; the newer key wins.
        if let ([(_, old_value)], [(new_key, new_value)]) =
            (old_entry.as_slice(), new_entry.as_slice())
        {
            changes.insert(
                new_key.clone(),
                FieldChange::new(Some(old_value.clone()), Some(new_value.clone())),
            );
            continue;
        }

        for (field, value) in old_entry {
            changes
                .entry(field)
                .or_insert_with(|| FieldChange::new(None, None))
                .old = Some(value);
        }
        for (field, value) in new_entry {
            changes
                .entry(field)
                .or_insert_with(|| FieldChange::new(None, None))
                .new = Some(value);
        }
    }
    changes
}

fn merge_by_key(old: Option<&Value>, new: Option<&Value>) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for (field, value) in old.map(entries).unwrap_or_default() {
        changes.insert(field, FieldChange::new(Some(value), None));
    }
    for (field, value) in new.map(entries).unwrap_or_default() {
        changes
            .entry(field)
            .or_insert_with(|| FieldChange::new(None, None))
            .new = Some(value);
    }
    changes
}

fn side(
    changes: &ChangeSet,
    pick: impl Fn(&FieldChange) -> Option<&Value>,
) -> Option<Map<String, Value>> {
    let map: Map<String, Value> = changes
        .iter()
        .filter_map(|(field, change)| pick(change).map(|v| (field.clone(), v.clone())))
        .collect();
    (!map.is_empty()).then_some(map)
}

/// Reads a client's audit history.
#[derive(Clone)]
pub struct AuditReader {
    db: Arc<dyn Database>,
    rbac: Arc<RbacEnforcer>,
}

impl std::fmt::Debug for AuditReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditReader")
            .field("backend", &self.db.backend())
            .finish()
    }
}

impl AuditReader {
    /// Creates a new audit reader.
    pub fn new(db: Arc<dyn Database>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { db, rbac }
    }

    /// Entries for one client, oldest first, with actor names resolved and
    /// payloads normalized. Stored rows are never rewritten.
    pub async fn list_for_client(
        &self,
        ctx: &RequestContext,
        client_id: i64,
    ) -> AppResult<Vec<AuditView>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ClientAuditRead)?;

        let mut uow = self.db.begin().await?;
        if uow.find_client(client_id).await?.is_none() {
            return Err(AppError::not_found(format!("Client {client_id} not found")));
        }

        uow.list_audits(client_id)
            .await?
            .into_iter()
            .map(|record| AuditEntry::try_from(record).map(AuditView::from))
            .collect()
    }
}
