//! Route definitions for the ClientDesk HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.
//! Protected groups carry their middleware as route layers, so the auth
//! check runs first, then role gating, then the handler's extractors.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the `/api` router with all routes and their guards.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(public_routes())
        .merge(session_routes(state.clone()))
        .merge(client_routes(state.clone()))
        .merge(employee_routes(state.clone()));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Login and health: no token required.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::health))
}

/// Any authenticated user.
fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/user", get(handlers::auth::current_user))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth::authenticate,
        ))
}

/// Clients, their history and the report: admins and employees.
fn client_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/client",
            get(handlers::client::list_clients).post(handlers::client::create_client),
        )
        .route("/client/report", get(handlers::client::client_report))
        .route(
            "/client/{id}",
            get(handlers::client::get_client)
                .put(handlers::client::update_client)
                .delete(handlers::client::deactivate_client),
        )
        .route("/client/{id}/logs", get(handlers::client::client_logs))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rbac::require_staff,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth::authenticate,
        ))
}

/// Employee management: admins only.
fn employee_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/employee",
            get(handlers::employee::list_employees).post(handlers::employee::create_employee),
        )
        .route(
            "/employee/{id}",
            get(handlers::employee::get_employee)
                .put(handlers::employee::update_employee)
                .delete(handlers::employee::delete_employee),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rbac::require_admin,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth::authenticate,
        ))
}
