//! Request context carrying the authenticated actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clientdesk_auth::session::Authenticated;
use clientdesk_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the auth middleware and passed into service methods so that
/// every operation knows *who* is acting and from *which* session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// The current session ID.
    pub session_id: Uuid,
    /// The user's current role.
    pub role: UserRole,
    /// The user's display name.
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: i64, session_id: Uuid, role: UserRole, name: String) -> Self {
        Self {
            user_id,
            session_id,
            role,
            name,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&Authenticated> for RequestContext {
    fn from(auth: &Authenticated) -> Self {
        Self::new(
            auth.user.id,
            auth.session_id,
            auth.user.role,
            auth.user.name.clone(),
        )
    }
}
