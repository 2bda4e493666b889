//! Employee account management.

pub mod service;

pub use service::{EmployeeCreated, EmployeeInput, EmployeePatch, EmployeeService};
