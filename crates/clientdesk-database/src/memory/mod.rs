//! In-memory store.
//!
//! Tables live behind one async mutex. A unit of work holds the lock for
//! its whole lifetime and writes to a private copy of the tables, which
//! replaces the shared tables on commit. Dropping it releases the lock and
//! discards the copy.

mod repositories;
mod tables;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use clientdesk_core::result::AppResult;

use crate::store::{Database, UnitOfWork};

pub(crate) use self::tables::Tables;

/// Store that keeps every table in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, work }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Exclusive access to the tables plus the working copy being edited.
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { mut guard, work } = *self;
        *guard = work;
        debug!("Memory transaction committed");
        Ok(())
    }
}
