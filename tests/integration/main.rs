//! HTTP-level integration tests, run against the in-memory store.

mod helpers;

mod auth_test;
mod client_test;
mod config_test;
mod employee_test;
mod permission_test;
