//! Client audit statements.

use async_trait::async_trait;

use clientdesk_core::result::AppResult;
use clientdesk_entity::audit::{AuditRecord, NewAuditEntry};

use super::{PgUnitOfWork, db_error};
use crate::store::AuditRepository;

#[async_trait]
impl AuditRepository for PgUnitOfWork {
    async fn insert_audit(&mut self, entry: &NewAuditEntry) -> AppResult<AuditRecord> {
        let changes = serde_json::to_value(&entry.changes)?;
        sqlx::query_as::<_, AuditRecord>(
            r#"INSERT INTO client_audits (client_id, user_id, action, changes)
               VALUES ($1, $2, $3, $4)
               RETURNING id, client_id, user_id, NULL::TEXT AS user_name, action,
                         changes, old_values, new_values, created_at"#,
        )
        .bind(entry.client_id)
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(changes)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to write audit entry"))
    }

    async fn list_audits(&mut self, client_id: i64) -> AppResult<Vec<AuditRecord>> {
        sqlx::query_as::<_, AuditRecord>(
            r#"SELECT a.id, a.client_id, a.user_id, u.name AS user_name, a.action,
                      a.changes, a.old_values, a.new_values, a.created_at
               FROM client_audits a
               LEFT JOIN users u ON u.id = a.user_id
               WHERE a.client_id = $1
               ORDER BY a.created_at ASC, a.id ASC"#,
        )
        .bind(client_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error("Failed to list audit entries"))
    }
}
