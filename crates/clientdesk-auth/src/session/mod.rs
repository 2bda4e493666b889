//! Session lifecycle management.

pub mod manager;

pub use manager::{Authenticated, LoginResult, SessionManager};
