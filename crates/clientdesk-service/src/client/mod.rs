//! Client record management.

pub mod service;

pub use service::{ClientInput, ClientPatch, ClientService};
