//! Client domain entities and their owned collections.

pub mod address;
pub mod document;
pub mod model;

pub use address::{Address, DEFAULT_COUNTRY, NewAddress};
pub use document::{Document, DocumentType, NewDocument};
pub use model::{Client, ClientChanges, ClientWithRelations, NewClient};

/// Upper bound on addresses and documents attached to one client.
pub const MAX_NESTED_ITEMS: usize = 4;
