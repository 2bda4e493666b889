//! Store wrapper for tests that need a write to fail mid-transaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use clientdesk_core::error::AppError;
use clientdesk_core::result::AppResult;
use clientdesk_database::MemoryDatabase;
use clientdesk_database::store::{
    AddressRepository, AuditRepository, ClientRepository, Database, DocumentRepository,
    EmployeeRepository, SessionRepository, UnitOfWork, UserRepository,
};
use clientdesk_entity::audit::{AuditRecord, NewAuditEntry};
use clientdesk_entity::client::{Address, Client, Document, NewAddress, NewClient, NewDocument};
use clientdesk_entity::employee::{Employee, EmployeeChanges, EmployeeWithUser, NewEmployee};
use clientdesk_entity::session::{NewSession, Session};
use clientdesk_entity::user::{NewUser, User, UserChanges};

/// In-memory store whose audit inserts fail while `fail_audits` is set.
#[derive(Debug, Clone, Default)]
pub struct FlakyAuditDatabase {
    inner: MemoryDatabase,
    fail_audits: Arc<AtomicBool>,
}

impl FlakyAuditDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_audits(&self, fail: bool) {
        self.fail_audits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Database for FlakyAuditDatabase {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(FlakyUnitOfWork {
            inner: self.inner.begin().await?,
            fail_audits: self.fail_audits.load(Ordering::SeqCst),
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    fn backend(&self) -> &'static str {
        "flaky-memory"
    }
}

struct FlakyUnitOfWork {
    inner: Box<dyn UnitOfWork>,
    fail_audits: bool,
}

#[async_trait]
impl UnitOfWork for FlakyUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.inner.commit().await
    }
}

#[async_trait]
impl AuditRepository for FlakyUnitOfWork {
    async fn insert_audit(&mut self, entry: &NewAuditEntry) -> AppResult<AuditRecord> {
        if self.fail_audits {
            return Err(AppError::database("audit insert failed"));
        }
        self.inner.insert_audit(entry).await
    }

    async fn list_audits(&mut self, client_id: i64) -> AppResult<Vec<AuditRecord>> {
        self.inner.list_audits(client_id).await
    }
}

#[async_trait]
impl ClientRepository for FlakyUnitOfWork {
    async fn list_clients(&mut self) -> AppResult<Vec<Client>> {
        self.inner.list_clients().await
    }

    async fn find_client(&mut self, id: i64) -> AppResult<Option<Client>> {
        self.inner.find_client(id).await
    }

    async fn insert_client(&mut self, client: &NewClient) -> AppResult<Client> {
        self.inner.insert_client(client).await
    }

    async fn save_client(&mut self, client: &Client) -> AppResult<Client> {
        self.inner.save_client(client).await
    }
}

#[async_trait]
impl AddressRepository for FlakyUnitOfWork {
    async fn list_addresses(&mut self, client_ids: &[i64]) -> AppResult<Vec<Address>> {
        self.inner.list_addresses(client_ids).await
    }

    async fn insert_address(
        &mut self,
        client_id: i64,
        address: &NewAddress,
    ) -> AppResult<Address> {
        self.inner.insert_address(client_id, address).await
    }

    async fn delete_addresses(&mut self, client_id: i64) -> AppResult<u64> {
        self.inner.delete_addresses(client_id).await
    }
}

#[async_trait]
impl DocumentRepository for FlakyUnitOfWork {
    async fn list_documents(&mut self, client_ids: &[i64]) -> AppResult<Vec<Document>> {
        self.inner.list_documents(client_ids).await
    }

    async fn insert_document(
        &mut self,
        client_id: i64,
        document: &NewDocument,
    ) -> AppResult<Document> {
        self.inner.insert_document(client_id, document).await
    }

    async fn delete_documents(&mut self, client_id: i64) -> AppResult<u64> {
        self.inner.delete_documents(client_id).await
    }
}

#[async_trait]
impl UserRepository for FlakyUnitOfWork {
    async fn find_user(&mut self, id: i64) -> AppResult<Option<User>> {
        self.inner.find_user(id).await
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        self.inner.find_user_by_email(email).await
    }

    async fn insert_user(&mut self, user: &NewUser) -> AppResult<User> {
        self.inner.insert_user(user).await
    }

    async fn update_user(&mut self, id: i64, changes: &UserChanges) -> AppResult<User> {
        self.inner.update_user(id, changes).await
    }

    async fn delete_user(&mut self, id: i64) -> AppResult<bool> {
        self.inner.delete_user(id).await
    }
}

#[async_trait]
impl EmployeeRepository for FlakyUnitOfWork {
    async fn list_employees(&mut self) -> AppResult<Vec<EmployeeWithUser>> {
        self.inner.list_employees().await
    }

    async fn find_employee(&mut self, id: i64) -> AppResult<Option<EmployeeWithUser>> {
        self.inner.find_employee(id).await
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> AppResult<Employee> {
        self.inner.insert_employee(employee).await
    }

    async fn update_employee(
        &mut self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> AppResult<Employee> {
        self.inner.update_employee(id, changes).await
    }

    async fn delete_employee(&mut self, id: i64) -> AppResult<bool> {
        self.inner.delete_employee(id).await
    }
}

#[async_trait]
impl SessionRepository for FlakyUnitOfWork {
    async fn insert_session(&mut self, session: &NewSession) -> AppResult<Session> {
        self.inner.insert_session(session).await
    }

    async fn find_session(&mut self, id: Uuid) -> AppResult<Option<Session>> {
        self.inner.find_session(id).await
    }

    async fn revoke_user_sessions(&mut self, user_id: i64) -> AppResult<u64> {
        self.inner.revoke_user_sessions(user_id).await
    }
}
