//! # clientdesk-database
//!
//! Store abstraction for ClientDesk plus its two implementations: a
//! PostgreSQL backend built on sqlx and an in-memory backend used for
//! development and tests.
//!
//! All access goes through a [`UnitOfWork`]: one transaction that exposes
//! every repository. Dropping a unit of work without committing it
//! discards its writes.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::connect_pool;
pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;
pub use store::{
    AddressRepository, AuditRepository, ClientRepository, Database, DocumentRepository,
    EmployeeRepository, SessionRepository, UnitOfWork, UserRepository,
};
