//! Table storage for the in-memory store.

use std::collections::BTreeMap;

use uuid::Uuid;

use clientdesk_entity::audit::AuditRecord;
use clientdesk_entity::client::{Address, Client, Document};
use clientdesk_entity::employee::Employee;
use clientdesk_entity::session::Session;
use clientdesk_entity::user::User;

/// Every table, keyed by primary key so iteration follows id order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub clients: BTreeMap<i64, Client>,
    pub addresses: BTreeMap<i64, Address>,
    pub documents: BTreeMap<i64, Document>,
    pub audits: BTreeMap<i64, AuditRecord>,
    pub users: BTreeMap<i64, User>,
    pub employees: BTreeMap<i64, Employee>,
    pub sessions: BTreeMap<Uuid, Session>,
    sequence: i64,
}

impl Tables {
    /// Next value of the shared id sequence.
    pub fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    /// Whether `email` belongs to a user other than `except`.
    pub fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }
}
