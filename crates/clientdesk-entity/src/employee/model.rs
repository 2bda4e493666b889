//! Employee entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::user::User;

/// Staff profile bound 1:1 to a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: i64,
    /// The linked user account.
    pub user_id: i64,
    /// Job title.
    pub job_title: Option<String>,
    /// Date the employee joined.
    pub joined_at: Option<NaiveDate>,
    /// When the employee was created.
    pub created_at: DateTime<Utc>,
    /// When the employee was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An employee with its user account loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeWithUser {
    /// The employee row.
    #[serde(flatten)]
    pub employee: Employee,
    /// The linked user account.
    pub user: User,
}

/// Data required to create a new employee row.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// The linked user account.
    pub user_id: i64,
    /// Job title.
    pub job_title: Option<String>,
    /// Date the employee joined.
    pub joined_at: Option<NaiveDate>,
}

/// A partial update to an employee row.
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    /// New job title.
    pub job_title: Option<String>,
    /// New join date.
    pub joined_at: Option<NaiveDate>,
}
