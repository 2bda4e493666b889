//! Store traits.
//!
//! Services never talk to a connection directly. They call
//! [`Database::begin`] to open a [`UnitOfWork`], use the repository
//! methods it exposes, and call [`UnitOfWork::commit`]. A unit of work
//! that is dropped without commit rolls back.

use async_trait::async_trait;
use uuid::Uuid;

use clientdesk_core::result::AppResult;
use clientdesk_entity::audit::{AuditRecord, NewAuditEntry};
use clientdesk_entity::client::{Address, Client, Document, NewAddress, NewClient, NewDocument};
use clientdesk_entity::employee::{Employee, EmployeeChanges, EmployeeWithUser, NewEmployee};
use clientdesk_entity::session::{NewSession, Session};
use clientdesk_entity::user::{NewUser, User, UserChanges};

/// Entry point to a backing store.
#[async_trait]
pub trait Database: Send + Sync + 'static {
    /// Open a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// One atomic transaction exposing every repository.
#[async_trait]
pub trait UnitOfWork:
    ClientRepository
    + AddressRepository
    + DocumentRepository
    + AuditRepository
    + UserRepository
    + EmployeeRepository
    + SessionRepository
    + Send
{
    /// Make every write performed through this unit of work durable.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Client rows.
#[async_trait]
pub trait ClientRepository: Send {
    /// All clients ordered by id.
    async fn list_clients(&mut self) -> AppResult<Vec<Client>>;

    /// Find a client by primary key.
    async fn find_client(&mut self, id: i64) -> AppResult<Option<Client>>;

    /// Insert an active client.
    async fn insert_client(&mut self, client: &NewClient) -> AppResult<Client>;

    /// Persist every scalar field of `client` and bump `updated_at`.
    async fn save_client(&mut self, client: &Client) -> AppResult<Client>;
}

/// Addresses owned by clients.
#[async_trait]
pub trait AddressRepository: Send {
    /// Addresses of the given clients ordered by id.
    async fn list_addresses(&mut self, client_ids: &[i64]) -> AppResult<Vec<Address>>;

    /// Attach one address to a client.
    async fn insert_address(&mut self, client_id: i64, address: &NewAddress)
    -> AppResult<Address>;

    /// Remove every address of a client. Returns the number removed.
    async fn delete_addresses(&mut self, client_id: i64) -> AppResult<u64>;
}

/// Identity documents owned by clients.
#[async_trait]
pub trait DocumentRepository: Send {
    /// Documents of the given clients ordered by id.
    async fn list_documents(&mut self, client_ids: &[i64]) -> AppResult<Vec<Document>>;

    /// Attach one document to a client.
    async fn insert_document(
        &mut self,
        client_id: i64,
        document: &NewDocument,
    ) -> AppResult<Document>;

    /// Remove every document of a client. Returns the number removed.
    async fn delete_documents(&mut self, client_id: i64) -> AppResult<u64>;
}

/// Append-only client audit trail.
#[async_trait]
pub trait AuditRepository: Send {
    /// Append one entry.
    async fn insert_audit(&mut self, entry: &NewAuditEntry) -> AppResult<AuditRecord>;

    /// Entries of a client ordered by `created_at`, then id, with the
    /// actor's display name joined in.
    async fn list_audits(&mut self, client_id: i64) -> AppResult<Vec<AuditRecord>>;
}

/// User accounts.
#[async_trait]
pub trait UserRepository: Send {
    /// Find a user by primary key.
    async fn find_user(&mut self, id: i64) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user. A taken email is a validation error on `email`.
    async fn insert_user(&mut self, user: &NewUser) -> AppResult<User>;

    /// Apply a partial update. A taken email is a validation error on `email`.
    async fn update_user(&mut self, id: i64, changes: &UserChanges) -> AppResult<User>;

    /// Delete a user together with its employee row and sessions.
    async fn delete_user(&mut self, id: i64) -> AppResult<bool>;
}

/// Employee profiles.
#[async_trait]
pub trait EmployeeRepository: Send {
    /// All employees with their users, ordered by id.
    async fn list_employees(&mut self) -> AppResult<Vec<EmployeeWithUser>>;

    /// Find an employee with its user.
    async fn find_employee(&mut self, id: i64) -> AppResult<Option<EmployeeWithUser>>;

    /// Insert an employee row for an existing user.
    async fn insert_employee(&mut self, employee: &NewEmployee) -> AppResult<Employee>;

    /// Apply a partial update.
    async fn update_employee(&mut self, id: i64, changes: &EmployeeChanges)
    -> AppResult<Employee>;

    /// Delete an employee row.
    async fn delete_employee(&mut self, id: i64) -> AppResult<bool>;
}

/// Login sessions.
#[async_trait]
pub trait SessionRepository: Send {
    /// Insert a session.
    async fn insert_session(&mut self, session: &NewSession) -> AppResult<Session>;

    /// Find a session by id.
    async fn find_session(&mut self, id: Uuid) -> AppResult<Option<Session>>;

    /// Revoke every active session of a user. Returns the number revoked.
    async fn revoke_user_sessions(&mut self, user_id: i64) -> AppResult<u64>;
}
