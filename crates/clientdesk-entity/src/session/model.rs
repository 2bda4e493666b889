//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A login session backing one bearer token.
///
/// Sessions are created on login (or employee provisioning) and revoked on
/// logout. A token is accepted only while its session is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier, carried in the token's `sid` claim.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: i64,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// When the session was revoked, if it was.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is still active (not revoked and not expired).
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Session identifier chosen by the caller.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: i64,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}
