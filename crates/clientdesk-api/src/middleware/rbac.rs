//! Role gating for route groups.
//!
//! Runs after [`authenticate`](super::auth::authenticate) and before any
//! body extraction, so a caller with the wrong role never reaches
//! validation.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use clientdesk_auth::rbac::SystemPermission;
use clientdesk_core::error::AppError;
use clientdesk_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Admins and employees: the `/client` routes.
pub async fn require_staff(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require(&state, &request, SystemPermission::ClientRead)?;
    Ok(next.run(request).await)
}

/// Admins only: the `/employee` routes.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require(&state, &request, SystemPermission::EmployeeManage)?;
    Ok(next.run(request).await)
}

fn require(state: &AppState, request: &Request, permission: SystemPermission) -> Result<(), AppError> {
    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .ok_or_else(|| AppError::authentication("Unauthenticated."))?;
    state
        .rbac_enforcer
        .require_permission(&ctx.role, &permission)
        .map_err(|_| AppError::authorization("This action is unauthorized."))
}
