//! Audit entry persistence.

use serde_json::{Map, Value};
use tracing::debug;

use clientdesk_core::error::AppError;
use clientdesk_core::result::AppResult;
use clientdesk_database::store::AuditRepository;
use clientdesk_entity::audit::{AuditAction, AuditRecord, ChangeSet, FieldChange, NewAuditEntry};

/// Merge old and new value maps into one change set over the union of
/// their keys. A key missing on one side has `None` on that side.
pub fn compose(old: Option<Map<String, Value>>, new: Option<Map<String, Value>>) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for (field, value) in old.unwrap_or_default() {
        changes.insert(field, FieldChange::new(Some(value), None));
    }
    for (field, value) in new.unwrap_or_default() {
        changes
            .entry(field)
            .or_insert_with(|| FieldChange::new(None, None))
            .new = Some(value);
    }
    changes
}

/// Writes audit entries through the caller's unit of work, so an entry
/// commits or rolls back together with the client mutation it describes.
#[derive(Debug, Clone, Default)]
pub struct AuditWriter;

impl AuditWriter {
    /// Creates a new audit writer.
    pub fn new() -> Self {
        Self
    }

    /// Record one event from separate old and new value maps.
    pub async fn record<R>(
        &self,
        repo: &mut R,
        action: AuditAction,
        client_id: i64,
        actor: Option<i64>,
        old_values: Option<Map<String, Value>>,
        new_values: Option<Map<String, Value>>,
    ) -> AppResult<AuditRecord>
    where
        R: AuditRepository + ?Sized,
    {
        let changes = compose(old_values, new_values);
        self.record_changes(repo, action, client_id, actor, changes)
            .await
    }

    /// Record one event from an already composed change set.
    ///
    /// An `update` with no changes is rejected; callers skip the write
    /// when the diff is empty.
    pub async fn record_changes<R>(
        &self,
        repo: &mut R,
        action: AuditAction,
        client_id: i64,
        actor: Option<i64>,
        changes: ChangeSet,
    ) -> AppResult<AuditRecord>
    where
        R: AuditRepository + ?Sized,
    {
        if action == AuditAction::Update && changes.is_empty() {
            return Err(AppError::internal(
                "Refusing to write an update audit entry without changes",
            ));
        }

        let record = repo
            .insert_audit(&NewAuditEntry {
                client_id,
                user_id: actor,
                action,
                changes,
            })
            .await?;

        debug!(
            audit_id = record.id,
            client_id,
            action = %action,
            "Audit entry written"
        );
        Ok(record)
    }
}
