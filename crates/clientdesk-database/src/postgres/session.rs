//! Login session statements.

use async_trait::async_trait;
use uuid::Uuid;

use clientdesk_core::result::AppResult;
use clientdesk_entity::session::{NewSession, Session};

use super::{PgUnitOfWork, db_error};
use crate::store::SessionRepository;

#[async_trait]
impl SessionRepository for PgUnitOfWork {
    async fn insert_session(&mut self, session: &NewSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (id, user_id, expires_at)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to create session"))
    }

    async fn find_session(&mut self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to find session"))
    }

    async fn revoke_user_sessions(&mut self, user_id: i64) -> AppResult<u64> {
        sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&mut *self.tx)
        .await
        .map(|r| r.rows_affected())
        .map_err(db_error("Failed to revoke sessions"))
    }
}
