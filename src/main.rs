//! ClientDesk Server: client records with a field-level audit trail.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use clientdesk_auth::password::PasswordHasher;
use clientdesk_core::config::{AppConfig, DatabaseBackend};
use clientdesk_core::error::AppError;
use clientdesk_database::store::Database;
use clientdesk_database::{MemoryDatabase, PgDatabase};

#[tokio::main]
async fn main() {
    let env = std::env::var("CLIENTDESK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ClientDesk v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Store ────────────────────────────────────────────
    let db = open_store(&config).await?;

    // ── Step 2: Bootstrap admin ──────────────────────────────────
    if let Some(bootstrap) = &config.bootstrap {
        let hasher = PasswordHasher::new();
        let created =
            clientdesk_service::bootstrap::seed_admin(db.as_ref(), &hasher, bootstrap).await?;
        if !created {
            tracing::info!(email = %bootstrap.email, "Bootstrap admin already present");
        }
    }

    // ── Step 3: HTTP server ──────────────────────────────────────
    clientdesk_api::run_server(config, db).await
}

/// Connect the configured backend and bring its schema up to date.
async fn open_store(config: &AppConfig) -> Result<Arc<dyn Database>, AppError> {
    match config.database.backend {
        DatabaseBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = clientdesk_database::connect_pool(&config.database).await?;

            if config.database.run_migrations {
                clientdesk_database::migration::run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgDatabase::new(pool)))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryDatabase::new()))
        }
    }
}
