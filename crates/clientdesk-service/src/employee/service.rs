//! Employee service: staff accounts and their user logins.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use clientdesk_auth::jwt::IssuedToken;
use clientdesk_auth::password::PasswordHasher;
use clientdesk_auth::rbac::{RbacEnforcer, SystemPermission};
use clientdesk_auth::session::SessionManager;
use clientdesk_core::error::AppError;
use clientdesk_core::result::AppResult;
use clientdesk_database::store::{Database, EmployeeRepository, UnitOfWork, UserRepository};
use clientdesk_entity::employee::{EmployeeChanges, EmployeeWithUser, NewEmployee};
use clientdesk_entity::user::{NewUser, UserChanges, UserRole};

use crate::context::RequestContext;

/// Data for creating an employee and its user account.
#[derive(Debug, Clone)]
pub struct EmployeeInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Job title.
    pub job_title: Option<String>,
    /// Date the employee joined.
    pub joined_at: Option<NaiveDate>,
}

/// A partial employee update. `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    /// New display name.
    pub name: Option<String>,
    /// New login email.
    pub email: Option<String>,
    /// New plain-text password.
    pub password: Option<String>,
    /// New job title.
    pub job_title: Option<String>,
    /// New join date.
    pub joined_at: Option<NaiveDate>,
}

/// A freshly created employee with a session already open for it.
#[derive(Debug, Clone)]
pub struct EmployeeCreated {
    /// The employee with its user.
    pub employee: EmployeeWithUser,
    /// Bearer token for the new user.
    pub token: IssuedToken,
}

/// Admin-only management of employees.
#[derive(Clone)]
pub struct EmployeeService {
    db: Arc<dyn Database>,
    password_hasher: Arc<PasswordHasher>,
    sessions: Arc<SessionManager>,
    rbac: Arc<RbacEnforcer>,
}

impl std::fmt::Debug for EmployeeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeService")
            .field("backend", &self.db.backend())
            .finish()
    }
}

impl EmployeeService {
    /// Creates a new employee service.
    pub fn new(
        db: Arc<dyn Database>,
        password_hasher: Arc<PasswordHasher>,
        sessions: Arc<SessionManager>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            db,
            password_hasher,
            sessions,
            rbac,
        }
    }

    /// All employees with their users.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<EmployeeWithUser>> {
        self.authorize(ctx)?;
        let mut uow = self.db.begin().await?;
        uow.list_employees().await
    }

    /// One employee with its user.
    pub async fn get(&self, ctx: &RequestContext, id: i64) -> AppResult<EmployeeWithUser> {
        self.authorize(ctx)?;
        let mut uow = self.db.begin().await?;
        find_or_404(&mut *uow, id).await
    }

    /// Create the user (role `employee`), the employee row and a session in
    /// one unit of work. A taken email fails before anything is written.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: EmployeeInput,
    ) -> AppResult<EmployeeCreated> {
        self.authorize(ctx)?;

        let password_hash = self.password_hasher.hash_password(&input.password)?;

        let mut uow = self.db.begin().await?;
        if uow.find_user_by_email(&input.email).await?.is_some() {
            return Err(email_taken());
        }

        let user = uow
            .insert_user(&NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                role: UserRole::Employee,
            })
            .await?;
        let employee = uow
            .insert_employee(&NewEmployee {
                user_id: user.id,
                job_title: input.job_title,
                joined_at: input.joined_at,
            })
            .await?;
        let (_session, token) = self.sessions.open_session(&mut *uow, &user).await?;
        uow.commit().await?;

        info!(
            employee_id = employee.id,
            user_id = user.id,
            actor = ctx.user_id,
            "Employee created"
        );
        Ok(EmployeeCreated {
            employee: EmployeeWithUser { employee, user },
            token,
        })
    }

    /// Update the user account and the employee row.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        patch: EmployeePatch,
    ) -> AppResult<EmployeeWithUser> {
        self.authorize(ctx)?;

        let password_hash = patch
            .password
            .as_deref()
            .map(|password| self.password_hasher.hash_password(password))
            .transpose()?;

        let mut uow = self.db.begin().await?;
        let current = find_or_404(&mut *uow, id).await?;
        let user_id = current.user.id;

        if let Some(email) = &patch.email {
            let holder = uow.find_user_by_email(email).await?;
            if holder.is_some_and(|u| u.id != user_id) {
                return Err(email_taken());
            }
        }

        let user_changes = UserChanges {
            name: patch.name,
            email: patch.email,
            password_hash,
        };
        let user = if user_changes.is_empty() {
            current.user
        } else {
            uow.update_user(user_id, &user_changes).await?
        };
        let employee = uow
            .update_employee(
                id,
                &EmployeeChanges {
                    job_title: patch.job_title,
                    joined_at: patch.joined_at,
                },
            )
            .await?;
        uow.commit().await?;

        info!(employee_id = id, user_id, actor = ctx.user_id, "Employee updated");
        Ok(EmployeeWithUser { employee, user })
    }

    /// Delete the employee and then its user; the user's sessions go with it.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        self.authorize(ctx)?;

        let mut uow = self.db.begin().await?;
        let current = find_or_404(&mut *uow, id).await?;
        uow.delete_employee(id).await?;
        uow.delete_user(current.user.id).await?;
        uow.commit().await?;

        info!(
            employee_id = id,
            user_id = current.user.id,
            actor = ctx.user_id,
            "Employee deleted"
        );
        Ok(())
    }

    fn authorize(&self, ctx: &RequestContext) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::EmployeeManage)
    }
}

async fn find_or_404(uow: &mut dyn UnitOfWork, id: i64) -> AppResult<EmployeeWithUser> {
    uow.find_employee(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))
}

fn email_taken() -> AppError {
    AppError::field("email", "The email has already been taken.")
}
