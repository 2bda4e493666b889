//! Auth handlers: login, logout, current user.

use axum::Json;
use axum::extract::State;

use clientdesk_core::error::{AppError, ErrorKind};
use clientdesk_entity::user::User;

use crate::dto::request::LoginRequest;
use crate::dto::response::{LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let result = state
        .session_manager
        .login(&req.email, &req.password)
        .await
        .map_err(|e| match e.kind {
            ErrorKind::Authentication => AppError::authentication("Invalid email or password"),
            _ => e,
        })?;

    Ok(Json(LoginResponse {
        role: result.user.role,
        user: result.user,
        token: result.token.token,
    }))
}

/// POST /api/logout
///
/// Revokes every session of the caller, not only the current one.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.session_manager.logout(auth.user_id).await?;
    Ok(Json(MessageResponse::new("Session closed")))
}

/// GET /api/user
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    let mut uow = state.db.begin().await?;
    let user = uow
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::authentication("Unauthenticated."))?;
    Ok(Json(user))
}
