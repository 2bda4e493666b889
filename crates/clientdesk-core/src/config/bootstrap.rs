//! Initial administrator account.

use serde::{Deserialize, Serialize};

/// Administrator created on startup when no user with `email` exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
}

fn default_name() -> String {
    "Administrator".to_string()
}
