//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use clientdesk_entity::user::UserRole;

/// A permission checked before an API operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// List and view clients.
    ClientRead,
    /// Create, update and deactivate clients.
    ClientWrite,
    /// Read a client's change history.
    ClientAuditRead,
    /// Export the client report.
    ClientReport,
    /// Create, update and delete employees.
    EmployeeManage,
}

/// Defines the mapping from each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use SystemPermission::*;

        let staff = [ClientRead, ClientWrite, ClientAuditRead, ClientReport];

        let mut policies: HashMap<UserRole, HashSet<SystemPermission>> = HashMap::new();
        policies.insert(UserRole::Employee, staff.into_iter().collect());
        policies.insert(
            UserRole::Admin,
            staff.into_iter().chain([EmployeeManage]).collect(),
        );

        Self { policies }
    }

    /// Returns the set of permissions for the given role.
    pub fn permissions_for_role(&self, role: &UserRole) -> HashSet<SystemPermission> {
        self.policies.get(role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies
            .get(role)
            .is_some_and(|perms| perms.contains(permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
