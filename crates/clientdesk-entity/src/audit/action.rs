//! Audit action enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of change an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// Client created.
    Create,
    /// Scalar fields changed.
    Update,
    /// Client deactivated.
    Deactivate,
    /// Client removed. Only present in historical rows.
    Delete,
}

impl AuditAction {
    /// Return the stored action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Deactivate => "deactivate",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = clientdesk_core::AppError;

    /// Accepts current names and the names written by earlier releases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" | "creacion" => Ok(Self::Create),
            "update" | "modificacion" => Ok(Self::Update),
            "deactivate" | "desactivar" => Ok(Self::Deactivate),
            "delete" | "eliminar" => Ok(Self::Delete),
            _ => Err(clientdesk_core::AppError::validation(format!(
                "Invalid audit action: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_names_map_to_actions() {
        assert_eq!("creacion".parse::<AuditAction>().unwrap(), AuditAction::Create);
        assert_eq!("modificacion".parse::<AuditAction>().unwrap(), AuditAction::Update);
        assert_eq!("desactivar".parse::<AuditAction>().unwrap(), AuditAction::Deactivate);
        assert_eq!("eliminar".parse::<AuditAction>().unwrap(), AuditAction::Delete);
        assert_eq!("update".parse::<AuditAction>().unwrap(), AuditAction::Update);
        assert!("archive".parse::<AuditAction>().is_err());
    }
}
