//! Employee domain entities.

pub mod model;

pub use model::{Employee, EmployeeChanges, EmployeeWithUser, NewEmployee};
