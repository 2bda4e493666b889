//! Client change tracking: diffing, writing and reading audit entries.

pub mod diff;
pub mod reader;
pub mod writer;

pub use diff::diff_fields;
pub use reader::{AuditReader, AuditView, normalize};
pub use writer::{AuditWriter, compose};
