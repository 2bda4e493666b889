//! # clientdesk-auth
//!
//! Authentication and authorization for ClientDesk.
//!
//! ## Modules
//!
//! - `jwt`: bearer token creation and validation
//! - `password`: Argon2id password hashing
//! - `rbac`: role to permission policies and their enforcement
//! - `session`: login, logout and token authentication against stored sessions

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use rbac::{RbacEnforcer, RbacPolicies, SystemPermission};
pub use session::{Authenticated, LoginResult, SessionManager};
