//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use clientdesk_auth::jwt::{JwtDecoder, JwtEncoder};
use clientdesk_auth::password::PasswordHasher;
use clientdesk_auth::rbac::RbacEnforcer;
use clientdesk_auth::session::SessionManager;
use clientdesk_core::config::AppConfig;
use clientdesk_database::store::Database;
use clientdesk_service::{
    AuditReader, AuditWriter, ClientReportService, ClientService, EmployeeService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Record store (Postgres or in-memory)
    pub db: Arc<dyn Database>,

    // ── Auth ─────────────────────────────────────────────────
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Role-based access control enforcer
    pub rbac_enforcer: Arc<RbacEnforcer>,

    // ── Services ─────────────────────────────────────────────
    /// Client records
    pub client_service: Arc<ClientService>,
    /// Client audit history
    pub audit_reader: Arc<AuditReader>,
    /// Employee accounts
    pub employee_service: Arc<EmployeeService>,
    /// Client report sheets
    pub report_service: Arc<ClientReportService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.db.backend())
            .field("session_manager", &self.session_manager)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire every service on top of the given store.
    pub fn new(config: AppConfig, db: Arc<dyn Database>) -> Self {
        let password_hasher = Arc::new(PasswordHasher::new());
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let rbac_enforcer = Arc::new(RbacEnforcer::new());

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&db),
            jwt_encoder,
            jwt_decoder,
            Arc::clone(&password_hasher),
        ));

        let client_service = Arc::new(ClientService::new(
            Arc::clone(&db),
            Arc::clone(&rbac_enforcer),
            AuditWriter::new(),
        ));
        let audit_reader = Arc::new(AuditReader::new(
            Arc::clone(&db),
            Arc::clone(&rbac_enforcer),
        ));
        let employee_service = Arc::new(EmployeeService::new(
            Arc::clone(&db),
            Arc::clone(&password_hasher),
            Arc::clone(&session_manager),
            Arc::clone(&rbac_enforcer),
        ));
        let report_service = Arc::new(ClientReportService::new(
            Arc::clone(&db),
            Arc::clone(&rbac_enforcer),
        ));

        Self {
            config: Arc::new(config),
            db,
            password_hasher,
            session_manager,
            rbac_enforcer,
            client_service,
            audit_reader,
            employee_service,
            report_service,
        }
    }
}
