//! Repository implementations over the working copy of the tables.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use clientdesk_core::error::AppError;
use clientdesk_core::result::AppResult;
use clientdesk_entity::audit::{AuditRecord, NewAuditEntry};
use clientdesk_entity::client::{Address, Client, Document, NewAddress, NewClient, NewDocument};
use clientdesk_entity::employee::{Employee, EmployeeChanges, EmployeeWithUser, NewEmployee};
use clientdesk_entity::session::{NewSession, Session};
use clientdesk_entity::user::{NewUser, User, UserChanges};

use super::MemoryUnitOfWork;
use crate::store::{
    AddressRepository, AuditRepository, ClientRepository, DocumentRepository, EmployeeRepository,
    SessionRepository, UserRepository,
};

fn email_taken() -> AppError {
    AppError::field("email", "The email has already been taken.")
}

#[async_trait]
impl ClientRepository for MemoryUnitOfWork {
    async fn list_clients(&mut self) -> AppResult<Vec<Client>> {
        Ok(self.work.clients.values().cloned().collect())
    }

    async fn find_client(&mut self, id: i64) -> AppResult<Option<Client>> {
        Ok(self.work.clients.get(&id).cloned())
    }

    async fn insert_client(&mut self, client: &NewClient) -> AppResult<Client> {
        let now = Utc::now();
        let row = Client {
            id: self.work.next_id(),
            name: client.name.clone(),
            last_name: client.last_name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.work.clients.insert(row.id, row.clone());
        Ok(row)
    }

    async fn save_client(&mut self, client: &Client) -> AppResult<Client> {
        let row = self
            .work
            .clients
            .get_mut(&client.id)
            .ok_or_else(|| AppError::database(format!("Client {} does not exist", client.id)))?;
        *row = Client {
            updated_at: Utc::now(),
            created_at: row.created_at,
            ..client.clone()
        };
        Ok(row.clone())
    }
}

#[async_trait]
impl AddressRepository for MemoryUnitOfWork {
    async fn list_addresses(&mut self, client_ids: &[i64]) -> AppResult<Vec<Address>> {
        Ok(self
            .work
            .addresses
            .values()
            .filter(|a| client_ids.contains(&a.client_id))
            .cloned()
            .collect())
    }

    async fn insert_address(
        &mut self,
        client_id: i64,
        address: &NewAddress,
    ) -> AppResult<Address> {
        if !self.work.clients.contains_key(&client_id) {
            return Err(AppError::database(format!("Client {client_id} does not exist")));
        }
        let now = Utc::now();
        let row = Address {
            id: self.work.next_id(),
            client_id,
            address: address.address.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.work.addresses.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_addresses(&mut self, client_id: i64) -> AppResult<u64> {
        let before = self.work.addresses.len();
        self.work.addresses.retain(|_, a| a.client_id != client_id);
        Ok((before - self.work.addresses.len()) as u64)
    }
}

#[async_trait]
impl DocumentRepository for MemoryUnitOfWork {
    async fn list_documents(&mut self, client_ids: &[i64]) -> AppResult<Vec<Document>> {
        Ok(self
            .work
            .documents
            .values()
            .filter(|d| client_ids.contains(&d.client_id))
            .cloned()
            .collect())
    }

    async fn insert_document(
        &mut self,
        client_id: i64,
        document: &NewDocument,
    ) -> AppResult<Document> {
        if !self.work.clients.contains_key(&client_id) {
            return Err(AppError::database(format!("Client {client_id} does not exist")));
        }
        let now = Utc::now();
        let row = Document {
            id: self.work.next_id(),
            client_id,
            document_type: document.document_type,
            document_number: document.document_number.clone(),
            created_at: now,
            updated_at: now,
        };
        self.work.documents.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_documents(&mut self, client_id: i64) -> AppResult<u64> {
        let before = self.work.documents.len();
        self.work.documents.retain(|_, d| d.client_id != client_id);
        Ok((before - self.work.documents.len()) as u64)
    }
}

#[async_trait]
impl AuditRepository for MemoryUnitOfWork {
    async fn insert_audit(&mut self, entry: &NewAuditEntry) -> AppResult<AuditRecord> {
        if !self.work.clients.contains_key(&entry.client_id) {
            return Err(AppError::database(format!(
                "Client {} does not exist",
                entry.client_id
            )));
        }
        let row = AuditRecord {
            id: self.work.next_id(),
            client_id: entry.client_id,
            user_id: entry.user_id,
            user_name: None,
            action: entry.action.as_str().to_string(),
            changes: Some(serde_json::to_value(&entry.changes)?),
            old_values: None,
            new_values: None,
            created_at: Utc::now(),
        };
        self.work.audits.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_audits(&mut self, client_id: i64) -> AppResult<Vec<AuditRecord>> {
        let mut rows: Vec<AuditRecord> = self
            .work
            .audits
            .values()
            .filter(|a| a.client_id == client_id)
            .map(|a| AuditRecord {
                user_name: a
                    .user_id
                    .and_then(|id| self.work.users.get(&id))
                    .map(|u| u.name.clone()),
                ..a.clone()
            })
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl UserRepository for MemoryUnitOfWork {
    async fn find_user(&mut self, id: i64) -> AppResult<Option<User>> {
        Ok(self.work.users.get(&id).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .work
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_user(&mut self, user: &NewUser) -> AppResult<User> {
        if self.work.email_taken(&user.email, None) {
            return Err(email_taken());
        }
        let now = Utc::now();
        let row = User {
            id: self.work.next_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.work.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_user(&mut self, id: i64, changes: &UserChanges) -> AppResult<User> {
        if let Some(email) = &changes.email {
            if self.work.email_taken(email, Some(id)) {
                return Err(email_taken());
            }
        }
        let row = self
            .work
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::database(format!("User {id} does not exist")))?;
        if let Some(name) = &changes.name {
            row.name.clone_from(name);
        }
        if let Some(email) = &changes.email {
            row.email.clone_from(email);
        }
        if let Some(hash) = &changes.password_hash {
            row.password_hash.clone_from(hash);
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_user(&mut self, id: i64) -> AppResult<bool> {
        if self.work.users.remove(&id).is_none() {
            return Ok(false);
        }
        self.work.employees.retain(|_, e| e.user_id != id);
        self.work.sessions.retain(|_, s| s.user_id != id);
        for audit in self.work.audits.values_mut() {
            if audit.user_id == Some(id) {
                audit.user_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryUnitOfWork {
    async fn list_employees(&mut self) -> AppResult<Vec<EmployeeWithUser>> {
        Ok(self
            .work
            .employees
            .values()
            .filter_map(|e| {
                self.work.users.get(&e.user_id).map(|u| EmployeeWithUser {
                    employee: e.clone(),
                    user: u.clone(),
                })
            })
            .collect())
    }

    async fn find_employee(&mut self, id: i64) -> AppResult<Option<EmployeeWithUser>> {
        Ok(self.work.employees.get(&id).and_then(|e| {
            self.work.users.get(&e.user_id).map(|u| EmployeeWithUser {
                employee: e.clone(),
                user: u.clone(),
            })
        }))
    }

    async fn insert_employee(&mut self, employee: &NewEmployee) -> AppResult<Employee> {
        if !self.work.users.contains_key(&employee.user_id) {
            return Err(AppError::database(format!(
                "User {} does not exist",
                employee.user_id
            )));
        }
        if self
            .work
            .employees
            .values()
            .any(|e| e.user_id == employee.user_id)
        {
            return Err(AppError::database(format!(
                "User {} already has an employee profile",
                employee.user_id
            )));
        }
        let now = Utc::now();
        let row = Employee {
            id: self.work.next_id(),
            user_id: employee.user_id,
            job_title: employee.job_title.clone(),
            joined_at: employee.joined_at,
            created_at: now,
            updated_at: now,
        };
        self.work.employees.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_employee(
        &mut self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> AppResult<Employee> {
        let row = self
            .work
            .employees
            .get_mut(&id)
            .ok_or_else(|| AppError::database(format!("Employee {id} does not exist")))?;
        if let Some(title) = &changes.job_title {
            row.job_title = Some(title.clone());
        }
        if let Some(joined_at) = changes.joined_at {
            row.joined_at = Some(joined_at);
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_employee(&mut self, id: i64) -> AppResult<bool> {
        Ok(self.work.employees.remove(&id).is_some())
    }
}

#[async_trait]
impl SessionRepository for MemoryUnitOfWork {
    async fn insert_session(&mut self, session: &NewSession) -> AppResult<Session> {
        if !self.work.users.contains_key(&session.user_id) {
            return Err(AppError::database(format!(
                "User {} does not exist",
                session.user_id
            )));
        }
        let row = Session {
            id: session.id,
            user_id: session.user_id,
            created_at: Utc::now(),
            expires_at: session.expires_at,
            revoked_at: None,
        };
        self.work.sessions.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_session(&mut self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.work.sessions.get(&id).cloned())
    }

    async fn revoke_user_sessions(&mut self, user_id: i64) -> AppResult<u64> {
        let now = Utc::now();
        let mut revoked = 0;
        for session in self.work.sessions.values_mut() {
            if session.user_id == user_id && session.revoked_at.is_none() {
                session.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}
