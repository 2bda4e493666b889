//! # clientdesk-core
//!
//! Core crate for ClientDesk. Contains configuration schemas and the
//! unified error system shared by every other crate.
//!
//! This crate has **no** internal dependencies on other ClientDesk crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind, FieldErrors};
pub use result::AppResult;
