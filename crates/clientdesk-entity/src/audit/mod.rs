//! Client audit trail entities.

pub mod action;
pub mod model;
pub mod payload;

pub use action::AuditAction;
pub use model::{AuditEntry, AuditRecord, NewAuditEntry};
pub use payload::{ChangePayload, ChangeSet, FieldChange};
