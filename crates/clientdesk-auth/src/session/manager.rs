//! Session lifecycle manager: login, logout and token authentication.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use clientdesk_core::error::AppError;
use clientdesk_core::result::AppResult;
use clientdesk_database::store::{Database, SessionRepository, UnitOfWork, UserRepository};
use clientdesk_entity::session::{NewSession, Session};
use clientdesk_entity::user::User;

use crate::jwt::{IssuedToken, JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// Created session.
    pub session: Session,
    /// Bearer token bound to the session.
    pub token: IssuedToken,
}

/// A caller whose bearer token maps to an active session.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// The user as currently stored.
    pub user: User,
    /// The session the token belongs to.
    pub session_id: Uuid,
}

/// Manages the session lifecycle against the store.
#[derive(Clone)]
pub struct SessionManager {
    db: Arc<dyn Database>,
    jwt_encoder: Arc<JwtEncoder>,
    jwt_decoder: Arc<JwtDecoder>,
    password_hasher: Arc<PasswordHasher>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("backend", &self.db.backend())
            .field("jwt_encoder", &self.jwt_encoder)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        db: Arc<dyn Database>,
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            db,
            jwt_encoder,
            jwt_decoder,
            password_hasher,
        }
    }

    /// Checks credentials, opens a session and issues its token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let user = {
            let mut uow = self.db.begin().await?;
            uow.find_user_by_email(email).await?
        };

        let Some(user) = user else {
            warn!(email = %email, "Login failed: unknown email");
            return Err(invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }

        let mut uow = self.db.begin().await?;
        let (session, token) = self.open_session(&mut *uow, &user).await?;
        uow.commit().await?;

        info!(user_id = user.id, session_id = %session.id, "User logged in");
        Ok(LoginResult {
            user,
            session,
            token,
        })
    }

    /// Inserts a session for `user` through the caller's unit of work and
    /// signs a token for it. Nothing is durable until the caller commits.
    pub async fn open_session<R>(
        &self,
        repo: &mut R,
        user: &User,
    ) -> AppResult<(Session, IssuedToken)>
    where
        R: SessionRepository + ?Sized,
    {
        let expires_at = Utc::now() + self.jwt_encoder.ttl();
        let session = repo
            .insert_session(&NewSession {
                id: Uuid::new_v4(),
                user_id: user.id,
                expires_at,
            })
            .await?;
        let token = self.jwt_encoder.issue(user, session.id, expires_at)?;
        Ok((session, token))
    }

    /// Resolves a bearer token to its user.
    ///
    /// The token must be validly signed and unexpired, and its session must
    /// still be active. The user is reloaded so role changes apply at once.
    pub async fn authenticate(&self, token: &str) -> AppResult<Authenticated> {
        let claims = self.jwt_decoder.decode(token)?;

        let mut uow = self.db.begin().await?;
        let session = uow
            .find_session(claims.session_id())
            .await?
            .filter(|s| s.user_id == claims.user_id() && s.is_active())
            .ok_or_else(|| AppError::authentication("Session is no longer active"))?;
        let user = uow
            .find_user(claims.user_id())
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;

        Ok(Authenticated {
            user,
            session_id: session.id,
        })
    }

    /// Revokes every session of the user, invalidating all of its tokens.
    pub async fn logout(&self, user_id: i64) -> AppResult<u64> {
        let mut uow = self.db.begin().await?;
        let revoked = uow.revoke_user_sessions(user_id).await?;
        uow.commit().await?;

        info!(user_id, revoked, "User logged out");
        Ok(revoked)
    }
}

fn invalid_credentials() -> AppError {
    AppError::authentication("Invalid credentials")
}
