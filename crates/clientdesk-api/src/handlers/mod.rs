//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod client;
pub mod employee;
pub mod health;
