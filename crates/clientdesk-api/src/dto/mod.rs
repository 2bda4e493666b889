//! Data transfer objects for HTTP bodies.

pub mod request;
pub mod response;
