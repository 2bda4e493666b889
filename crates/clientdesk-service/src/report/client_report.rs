//! Flattens clients and their nested rows into one sheet.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use clientdesk_auth::rbac::{RbacEnforcer, SystemPermission};
use clientdesk_core::error::AppError;
use clientdesk_core::result::AppResult;
use clientdesk_database::store::{ClientRepository, Database};
use clientdesk_entity::client::ClientWithRelations;

use crate::client::service::with_relations;
use crate::context::RequestContext;

const FIXED_COLUMNS: [&str; 8] = [
    "Client ID",
    "Name",
    "Last Name",
    "Email",
    "Phone",
    "Active",
    "Created At",
    "Updated At",
];

/// A header row plus one row per client. Cells past a client's last
/// address or document are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSheet {
    /// Column headers.
    pub columns: Vec<String>,
    /// One row per client, each as wide as `columns`.
    pub rows: Vec<Vec<Value>>,
}

/// Builds client report sheets.
#[derive(Clone)]
pub struct ClientReportService {
    db: Arc<dyn Database>,
    rbac: Arc<RbacEnforcer>,
}

impl std::fmt::Debug for ClientReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientReportService")
            .field("backend", &self.db.backend())
            .finish()
    }
}

impl ClientReportService {
    /// Creates a new report service.
    pub fn new(db: Arc<dyn Database>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { db, rbac }
    }

    /// Report on every client, or on `client_id` alone.
    pub async fn build(
        &self,
        ctx: &RequestContext,
        client_id: Option<i64>,
    ) -> AppResult<ReportSheet> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ClientReport)?;

        let mut uow = self.db.begin().await?;
        let clients = match client_id {
            Some(id) => vec![
                uow.find_client(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Client {id} not found")))?,
            ],
            None => uow.list_clients().await?,
        };
        let clients = with_relations(&mut *uow, clients).await?;

        let sheet = flatten(&clients);
        debug!(rows = sheet.rows.len(), columns = sheet.columns.len(), "Client report built");
        Ok(sheet)
    }
}

/// Lay clients out in one table. Address and document column groups repeat
/// as many times as the widest client needs.
pub fn flatten(clients: &[ClientWithRelations]) -> ReportSheet {
    let address_groups = clients.iter().map(|c| c.addresses.len()).max().unwrap_or(0);
    let document_groups = clients.iter().map(|c| c.documents.len()).max().unwrap_or(0);

    let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    for n in 1..=address_groups {
        columns.push(format!("Address {n}"));
        columns.push(format!("Postal Code {n}"));
        columns.push(format!("Country {n}"));
    }
    for n in 1..=document_groups {
        columns.push(format!("Document Type {n}"));
        columns.push(format!("Document Number {n}"));
    }

    let rows = clients
        .iter()
        .map(|c| {
            let client = &c.client;
            let mut row = vec![
                Value::from(client.id),
                Value::from(client.name.as_str()),
                Value::from(client.last_name.as_str()),
                Value::from(client.email.as_str()),
                Value::from(client.phone.as_str()),
                Value::from(if client.is_active { "Yes" } else { "No" }),
                Value::from(client.created_at.to_rfc3339()),
                Value::from(client.updated_at.to_rfc3339()),
            ];
            for i in 0..address_groups {
                match c.addresses.get(i) {
                    Some(a) => row.extend([
                        Value::from(a.address.as_str()),
                        a.postal_code.as_deref().map_or(Value::Null, Value::from),
                        Value::from(a.country.as_str()),
                    ]),
                    None => row.extend([Value::Null, Value::Null, Value::Null]),
                }
            }
            for i in 0..document_groups {
                match c.documents.get(i) {
                    Some(d) => row.extend([
                        Value::from(d.document_type.as_str()),
                        Value::from(d.document_number.as_str()),
                    ]),
                    None => row.extend([Value::Null, Value::Null]),
                }
            }
            row
        })
        .collect();

    ReportSheet { columns, rows }
}
