//! Client handlers: CRUD, audit history and report.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use clientdesk_service::report::ReportSheet;

use crate::dto::request::{CreateClientRequest, ReportQuery, UpdateClientRequest};
use crate::dto::response::{
    ClientListResponse, ClientLogsResponse, ClientMessageResponse, ClientResponse,
    MessageResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/client
pub async fn list_clients(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ClientListResponse>, ApiError> {
    let clients = state.client_service.list(&auth).await?;
    Ok(Json(ClientListResponse { clients }))
}

/// POST /api/client
pub async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientMessageResponse>), ApiError> {
    let client = state.client_service.create(&auth, req.into_input()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ClientMessageResponse {
            message: "Client created successfully".to_string(),
            client,
        }),
    ))
}

/// GET /api/client/{id}
pub async fn get_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ClientResponse>, ApiError> {
    let id = parse_id(&id, "Client")?;
    let client = state.client_service.get(&auth, id).await?;
    Ok(Json(ClientResponse { client }))
}

/// PUT /api/client/{id}
pub async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateClientRequest>,
) -> Result<Json<ClientMessageResponse>, ApiError> {
    let id = parse_id(&id, "Client")?;
    let client = state
        .client_service
        .update(&auth, id, req.into_patch())
        .await?;
    Ok(Json(ClientMessageResponse {
        message: "Client updated successfully".to_string(),
        client,
    }))
}

/// DELETE /api/client/{id}
///
/// Deactivates the client; rows are never hard-deleted.
pub async fn deactivate_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "Client")?;
    state.client_service.deactivate(&auth, id).await?;
    Ok(Json(MessageResponse::new("Client deactivated successfully")))
}

/// GET /api/client/{id}/logs
pub async fn client_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ClientLogsResponse>, ApiError> {
    let client_id = parse_id(&id, "Client")?;
    let logs = state.audit_reader.list_for_client(&auth, client_id).await?;
    Ok(Json(ClientLogsResponse { client_id, logs }))
}

/// GET /api/client/report
pub async fn client_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportSheet>, ApiError> {
    let sheet = state.report_service.build(&auth, query.client_id).await?;
    Ok(Json(sheet))
}
