//! # clientdesk-service
//!
//! Business logic service layer for ClientDesk. Each service opens units of
//! work on the store and implements one application-level use case per
//! method.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod audit;
pub mod bootstrap;
pub mod client;
pub mod context;
pub mod employee;
pub mod report;

#[cfg(test)]
mod testing;

pub use audit::{AuditReader, AuditView, AuditWriter};
pub use client::ClientService;
pub use context::RequestContext;
pub use employee::EmployeeService;
pub use report::ClientReportService;
