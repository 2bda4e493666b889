//! PostgreSQL store.
//!
//! Every unit of work is one sqlx transaction; the repository
//! implementations in the sibling modules run their statements on it.

mod audit;
mod client;
mod employee;
mod session;
mod user;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use clientdesk_core::error::{AppError, ErrorKind};
use clientdesk_core::result::AppResult;

use crate::store::{Database, UnitOfWork};

/// Unique constraint on `users.email`.
const USERS_EMAIL_KEY: &str = "users_email_key";

/// Store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Wrap an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// An open PostgreSQL transaction.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        debug!("Transaction committed");
        Ok(())
    }
}

/// Map a failed statement to a database error.
fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

/// Map a failed user write, turning a duplicate email into a field error.
fn user_write_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(USERS_EMAIL_KEY) => {
            AppError::field("email", "The email has already been taken.")
        }
        other => AppError::with_source(ErrorKind::Database, message, other),
    }
}
