//! # clientdesk-entity
//!
//! Domain entity models for ClientDesk. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod client;
pub mod employee;
pub mod session;
pub mod user;
