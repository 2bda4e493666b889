//! PostgreSQL connection pool setup.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use clientdesk_core::config::DatabaseConfig;
use clientdesk_core::error::{AppError, ErrorKind};
use clientdesk_core::result::AppResult;

/// Open a connection pool sized from configuration.
pub async fn connect_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    info!(
        url = %mask_password(&config.url),
        max_connections = config.max_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to connect to database: {e}"),
                e,
            )
        })?;

    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Replace the password in a connection URL with `****` for logging.
fn mask_password(url: &str) -> String {
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    let Some(at) = url.rfind('@') else {
        return url.to_string();
    };
    match url[scheme_end..at].find(':') {
        Some(offset) => {
            let colon = scheme_end + offset;
            format!("{}:****@{}", &url[..colon], &url[at + 1..])
        }
        None => url.to_string(),
    }
}
