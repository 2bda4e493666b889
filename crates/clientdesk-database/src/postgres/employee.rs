//! Employee statements.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use clientdesk_core::result::AppResult;
use clientdesk_entity::employee::{Employee, EmployeeChanges, EmployeeWithUser, NewEmployee};
use clientdesk_entity::user::{User, UserRole};

use super::{PgUnitOfWork, db_error};
use crate::store::EmployeeRepository;

const SELECT_EMPLOYEE_WITH_USER: &str = r#"
    SELECT e.id, e.user_id, e.job_title, e.joined_at, e.created_at, e.updated_at,
           u.name AS user_name, u.email AS user_email, u.password_hash AS user_password_hash,
           u.role AS user_role, u.created_at AS user_created_at, u.updated_at AS user_updated_at
    FROM employees e
    JOIN users u ON u.id = e.user_id
"#;

/// Flat row of the employee/user join.
#[derive(Debug, FromRow)]
struct EmployeeUserRow {
    id: i64,
    user_id: i64,
    job_title: Option<String>,
    joined_at: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
    user_password_hash: String,
    user_role: UserRole,
    user_created_at: DateTime<Utc>,
    user_updated_at: DateTime<Utc>,
}

impl From<EmployeeUserRow> for EmployeeWithUser {
    fn from(row: EmployeeUserRow) -> Self {
        Self {
            employee: Employee {
                id: row.id,
                user_id: row.user_id,
                job_title: row.job_title,
                joined_at: row.joined_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            user: User {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                password_hash: row.user_password_hash,
                role: row.user_role,
                created_at: row.user_created_at,
                updated_at: row.user_updated_at,
            },
        }
    }
}

#[async_trait]
impl EmployeeRepository for PgUnitOfWork {
    async fn list_employees(&mut self) -> AppResult<Vec<EmployeeWithUser>> {
        let rows = sqlx::query_as::<_, EmployeeUserRow>(&format!(
            "{SELECT_EMPLOYEE_WITH_USER} ORDER BY e.id"
        ))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(db_error("Failed to list employees"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_employee(&mut self, id: i64) -> AppResult<Option<EmployeeWithUser>> {
        let row = sqlx::query_as::<_, EmployeeUserRow>(&format!(
            "{SELECT_EMPLOYEE_WITH_USER} WHERE e.id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error("Failed to find employee"))?;
        Ok(row.map(Into::into))
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"INSERT INTO employees (user_id, job_title, joined_at)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(employee.user_id)
        .bind(&employee.job_title)
        .bind(employee.joined_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to create employee"))
    }

    async fn update_employee(
        &mut self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"UPDATE employees
               SET job_title = COALESCE($2, job_title),
                   joined_at = COALESCE($3, joined_at),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&changes.job_title)
        .bind(changes.joined_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to update employee"))
    }

    async fn delete_employee(&mut self, id: i64) -> AppResult<bool> {
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(db_error("Failed to delete employee"))
    }
}
