//! Bearer token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use clientdesk_core::error::AppError;
use clientdesk_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the bearer token to an active session and stores the caller's
/// `RequestContext` in the request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::authentication("Unauthenticated."))?;

    let auth = state.session_manager.authenticate(token).await?;
    request
        .extensions_mut()
        .insert(RequestContext::from(&auth));

    Ok(next.run(request).await)
}
