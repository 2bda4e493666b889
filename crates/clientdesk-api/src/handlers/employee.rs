//! Employee handlers (admin only).

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::request::{CreateEmployeeRequest, UpdateEmployeeRequest};
use crate::dto::response::{
    EmployeeCreatedResponse, EmployeeListResponse, EmployeeMessageResponse, EmployeeResponse,
    MessageResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/employee
pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<EmployeeListResponse>, ApiError> {
    let employees = state.employee_service.list(&auth).await?;
    Ok(Json(EmployeeListResponse { employees }))
}

/// POST /api/employee
pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeCreatedResponse>), ApiError> {
    let created = state
        .employee_service
        .create(&auth, req.into_input())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EmployeeCreatedResponse {
            message: "Employee created successfully".to_string(),
            employee: created.employee.employee,
            user: created.employee.user,
            token: created.token.token,
        }),
    ))
}

/// GET /api/employee/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<EmployeeResponse>, ApiError> {
    let id = parse_id(&id, "Employee")?;
    let employee = state.employee_service.get(&auth, id).await?;
    Ok(Json(EmployeeResponse { employee }))
}

/// PUT /api/employee/{id}
pub async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeMessageResponse>, ApiError> {
    let id = parse_id(&id, "Employee")?;
    let employee = state
        .employee_service
        .update(&auth, id, req.into_patch())
        .await?;
    Ok(Json(EmployeeMessageResponse {
        message: "Employee updated successfully".to_string(),
        employee,
    }))
}

/// DELETE /api/employee/{id}
pub async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "Employee")?;
    state.employee_service.delete(&auth, id).await?;
    Ok(Json(MessageResponse::new(
        "Employee and associated user deleted successfully",
    )))
}
