//! Client CRUD with change tracking.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use clientdesk_auth::rbac::{RbacEnforcer, SystemPermission};
use clientdesk_core::error::{AppError, FieldErrors};
use clientdesk_core::result::AppResult;
use clientdesk_database::store::{
    AddressRepository, ClientRepository, Database, DocumentRepository, UnitOfWork,
};
use clientdesk_entity::audit::AuditAction;
use clientdesk_entity::client::{
    Client, ClientChanges, ClientWithRelations, MAX_NESTED_ITEMS, NewAddress, NewClient,
    NewDocument,
};

use crate::audit::{AuditWriter, diff_fields};
use crate::context::RequestContext;

/// Data for creating a client with its nested collections.
#[derive(Debug, Clone)]
pub struct ClientInput {
    /// Scalar fields.
    pub client: NewClient,
    /// Addresses to attach.
    pub addresses: Vec<NewAddress>,
    /// Documents to attach.
    pub documents: Vec<NewDocument>,
}

/// A partial client update.
///
/// `None` collections are left alone; `Some` collections replace every
/// stored row of that kind, including with an empty list.
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    /// Scalar fields to change.
    pub changes: ClientChanges,
    /// Replacement addresses.
    pub addresses: Option<Vec<NewAddress>>,
    /// Replacement documents.
    pub documents: Option<Vec<NewDocument>>,
}

/// Creates, updates and deactivates clients, auditing every mutation in
/// the same unit of work.
///
/// Concurrent updates to one client are not coordinated; the last commit
/// wins.
#[derive(Clone)]
pub struct ClientService {
    db: Arc<dyn Database>,
    rbac: Arc<RbacEnforcer>,
    audit: AuditWriter,
}

impl std::fmt::Debug for ClientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientService")
            .field("backend", &self.db.backend())
            .finish()
    }
}

impl ClientService {
    /// Creates a new client service.
    pub fn new(db: Arc<dyn Database>, rbac: Arc<RbacEnforcer>, audit: AuditWriter) -> Self {
        Self { db, rbac, audit }
    }

    /// Every client with its addresses and documents.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<ClientWithRelations>> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ClientRead)?;

        let mut uow = self.db.begin().await?;
        let clients = uow.list_clients().await?;
        with_relations(&mut *uow, clients).await
    }

    /// One client with its addresses and documents.
    pub async fn get(&self, ctx: &RequestContext, id: i64) -> AppResult<ClientWithRelations> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ClientRead)?;

        let mut uow = self.db.begin().await?;
        let client = find_or_404(&mut *uow, id).await?;
        single(&mut *uow, client).await
    }

    /// Create an active client, attach its nested rows and audit the
    /// submitted data as a `create` entry.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: ClientInput,
    ) -> AppResult<ClientWithRelations> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ClientWrite)?;
        check_nested_limits(Some(&input.addresses), Some(&input.documents))?;

        let mut submitted = to_map(&input.client)?;
        submitted.insert("addresses".into(), serde_json::to_value(&input.addresses)?);
        submitted.insert("documents".into(), serde_json::to_value(&input.documents)?);

        let mut uow = self.db.begin().await?;
        let client = uow.insert_client(&input.client).await?;
        for address in &input.addresses {
            uow.insert_address(client.id, address).await?;
        }
        for document in &input.documents {
            uow.insert_document(client.id, document).await?;
        }
        self.audit
            .record(
                &mut *uow,
                AuditAction::Create,
                client.id,
                Some(ctx.user_id),
                None,
                Some(submitted),
            )
            .await?;

        let created = single(&mut *uow, client).await?;
        uow.commit().await?;

        info!(client_id = created.client.id, actor = ctx.user_id, "Client created");
        Ok(created)
    }

    /// Apply a patch.
    ///
    /// Scalar fields are diffed against the stored row; only when something
    /// differs is the row saved and one `update` entry written. Submitted
    /// collections replace the stored ones wholesale and are not part of
    /// the diff.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        patch: ClientPatch,
    ) -> AppResult<ClientWithRelations> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ClientWrite)?;
        check_nested_limits(patch.addresses.as_ref(), patch.documents.as_ref())?;

        let mut uow = self.db.begin().await?;
        let mut client = find_or_404(&mut *uow, id).await?;

        let changes = diff_fields(&client.snapshot(), &patch.changes.to_map());
        let changed_fields = changes.len();
        if !changes.is_empty() {
            client.apply(&patch.changes);
            client = uow.save_client(&client).await?;
            self.audit
                .record_changes(
                    &mut *uow,
                    AuditAction::Update,
                    id,
                    Some(ctx.user_id),
                    changes,
                )
                .await?;
        }

        if let Some(addresses) = &patch.addresses {
            uow.delete_addresses(id).await?;
            for address in addresses {
                uow.insert_address(id, address).await?;
            }
        }
        if let Some(documents) = &patch.documents {
            uow.delete_documents(id).await?;
            for document in documents {
                uow.insert_document(id, document).await?;
            }
        }

        let updated = single(&mut *uow, client).await?;
        uow.commit().await?;

        info!(
            client_id = id,
            actor = ctx.user_id,
            changed_fields,
            "Client updated"
        );
        Ok(updated)
    }

    /// Deactivate an active client.
    ///
    /// Removes its addresses and documents, clears the active flag and
    /// writes a `deactivate` entry holding the full prior state. An
    /// already inactive client is a conflict.
    pub async fn deactivate(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::ClientWrite)?;

        let mut uow = self.db.begin().await?;
        let mut client = find_or_404(&mut *uow, id).await?;
        if !client.is_active {
            return Err(AppError::conflict(format!("Client {id} is already inactive")));
        }

        let prior = single(&mut *uow, client.clone()).await?;
        let mut old_values = client.snapshot();
        old_values.insert("addresses".into(), serde_json::to_value(&prior.addresses)?);
        old_values.insert("documents".into(), serde_json::to_value(&prior.documents)?);

        let removed_addresses = uow.delete_addresses(id).await?;
        let removed_documents = uow.delete_documents(id).await?;

        client.is_active = false;
        uow.save_client(&client).await?;

        let mut new_values = Map::new();
        new_values.insert("is_active".into(), Value::Bool(false));
        self.audit
            .record(
                &mut *uow,
                AuditAction::Deactivate,
                id,
                Some(ctx.user_id),
                Some(old_values),
                Some(new_values),
            )
            .await?;

        uow.commit().await?;

        info!(
            client_id = id,
            actor = ctx.user_id,
            removed_addresses,
            removed_documents,
            "Client deactivated"
        );
        Ok(())
    }
}

async fn find_or_404(uow: &mut dyn UnitOfWork, id: i64) -> AppResult<Client> {
    uow.find_client(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {id} not found")))
}

async fn single(uow: &mut dyn UnitOfWork, client: Client) -> AppResult<ClientWithRelations> {
    let mut loaded = with_relations(uow, vec![client]).await?;
    loaded
        .pop()
        .ok_or_else(|| AppError::internal("Client relations could not be loaded"))
}

/// Attach addresses and documents to each client, preserving order.
pub(crate) async fn with_relations(
    uow: &mut dyn UnitOfWork,
    clients: Vec<Client>,
) -> AppResult<Vec<ClientWithRelations>> {
    let ids: Vec<i64> = clients.iter().map(|c| c.id).collect();

    let mut addresses: HashMap<i64, Vec<_>> = HashMap::new();
    for address in uow.list_addresses(&ids).await? {
        addresses.entry(address.client_id).or_default().push(address);
    }
    let mut documents: HashMap<i64, Vec<_>> = HashMap::new();
    for document in uow.list_documents(&ids).await? {
        documents.entry(document.client_id).or_default().push(document);
    }

    Ok(clients
        .into_iter()
        .map(|client| ClientWithRelations {
            addresses: addresses.remove(&client.id).unwrap_or_default(),
            documents: documents.remove(&client.id).unwrap_or_default(),
            client,
        })
        .collect())
}

fn check_nested_limits(
    addresses: Option<&Vec<NewAddress>>,
    documents: Option<&Vec<NewDocument>>,
) -> AppResult<()> {
    let mut fields = FieldErrors::new();
    for (field, len) in [
        ("addresses", addresses.map(Vec::len)),
        ("documents", documents.map(Vec::len)),
    ] {
        if len.is_some_and(|n| n > MAX_NESTED_ITEMS) {
            fields.insert(
                field.to_string(),
                vec![format!(
                    "The {field} field must not have more than {MAX_NESTED_ITEMS} items."
                )],
            );
        }
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation_fields("The given data was invalid.", fields))
    }
}

fn to_map<T: serde::Serialize>(value: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::internal("Expected a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditReader;
    use clientdesk_core::error::ErrorKind;
    use clientdesk_database::MemoryDatabase;
    use clientdesk_database::store::AuditRepository;
    use clientdesk_entity::audit::FieldChange;
    use clientdesk_entity::client::DocumentType;
    use clientdesk_entity::user::UserRole;
    use serde_json::json;
    use uuid::Uuid;

    struct Fixture {
        db: Arc<dyn Database>,
        service: ClientService,
        reader: AuditReader,
        ctx: RequestContext,
    }

    fn fixture() -> Fixture {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());
        let rbac = Arc::new(RbacEnforcer::new());
        Fixture {
            service: ClientService::new(Arc::clone(&db), Arc::clone(&rbac), AuditWriter::new()),
            reader: AuditReader::new(Arc::clone(&db), rbac),
            db,
            ctx: RequestContext::new(1, Uuid::new_v4(), UserRole::Employee, "Maria".into()),
        }
    }

    fn ana() -> ClientInput {
        ClientInput {
            client: NewClient {
                name: "Ana".into(),
                last_name: "Lopez".into(),
                email: "ana@x.com".into(),
                phone: "71234567".into(),
            },
            addresses: vec![],
            documents: vec![],
        }
    }

    fn same_scalars_as_ana(name: &str) -> ClientPatch {
        ClientPatch {
            changes: ClientChanges {
                name: Some(name.into()),
                last_name: Some("Lopez".into()),
                email: Some("ana@x.com".into()),
                phone: Some("71234567".into()),
            },
            addresses: Some(vec![]),
            documents: Some(vec![]),
        }
    }

    async fn audit_count(db: &Arc<dyn Database>, client_id: i64) -> usize {
        let mut uow = db.begin().await.unwrap();
        uow.list_audits(client_id).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_ana_anna_scenario() {
        let f = fixture();
        let created = f.service.create(&f.ctx, ana()).await.unwrap();
        let id = created.client.id;

        let history = f.reader.list_for_client(&f.ctx, id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, AuditAction::Create);
        assert_eq!(
            history[0].new_values.as_ref().unwrap().get("name"),
            Some(&json!("Ana"))
        );

        f.service
            .update(&f.ctx, id, same_scalars_as_ana("Anna"))
            .await
            .unwrap();
        let history = f.reader.list_for_client(&f.ctx, id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].action, AuditAction::Update);
        assert_eq!(history[1].changes.len(), 1);
        assert_eq!(
            history[1].changes["name"],
            FieldChange::new(Some(json!("Ana")), Some(json!("Anna")))
        );

        f.service
            .update(&f.ctx, id, same_scalars_as_ana("Anna"))
            .await
            .unwrap();
        assert_eq!(audit_count(&f.db, id).await, 2);
    }

    #[tokio::test]
    async fn test_update_change_keys_match_differing_fields() {
        let f = fixture();
        let id = f.service.create(&f.ctx, ana()).await.unwrap().client.id;

        let patch = ClientPatch {
            changes: ClientChanges {
                email: Some("anna@x.com".into()),
                phone: Some("70000000".into()),
                name: Some("Ana".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let updated = f.service.update(&f.ctx, id, patch).await.unwrap();
        assert_eq!(updated.client.email, "anna@x.com");

        let history = f.reader.list_for_client(&f.ctx, id).await.unwrap();
        let keys: Vec<&str> = history[1].changes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["email", "phone"]);
    }

    #[tokio::test]
    async fn test_nested_round_trip_and_replacement() {
        let f = fixture();
        let mut input = ana();
        input.addresses = vec![
            NewAddress {
                address: "Calle 1".into(),
                postal_code: Some("1101".into()),
                country: None,
            },
            NewAddress {
                address: "Calle 2".into(),
                postal_code: None,
                country: Some("Guatemala".into()),
            },
        ];
        input.documents = vec![NewDocument {
            document_type: DocumentType::NationalId,
            document_number: "01234567-8".into(),
        }];

        let created = f.service.create(&f.ctx, input).await.unwrap();
        let loaded = f.service.get(&f.ctx, created.client.id).await.unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.addresses.len(), 2);
        assert_eq!(loaded.addresses[0].country, "El Salvador");
        assert_eq!(loaded.addresses[1].country, "Guatemala");
        assert_eq!(loaded.documents.len(), 1);

        let patch = ClientPatch {
            addresses: Some(vec![NewAddress {
                address: "Calle 3".into(),
                postal_code: None,
                country: None,
            }]),
            ..Default::default()
        };
        let updated = f.service.update(&f.ctx, created.client.id, patch).await.unwrap();
        assert_eq!(updated.addresses.len(), 1);
        assert_eq!(updated.addresses[0].address, "Calle 3");
        assert_eq!(updated.documents.len(), 1);
        assert_eq!(audit_count(&f.db, created.client.id).await, 1);
    }

    #[tokio::test]
    async fn test_deactivate_cascades_and_conflicts_second_time() {
        let f = fixture();
        let mut input = ana();
        input.addresses = vec![NewAddress {
            address: "Calle 1".into(),
            postal_code: None,
            country: None,
        }];
        input.documents = vec![NewDocument {
            document_type: DocumentType::Passport,
            document_number: "A123".into(),
        }];
        let id = f.service.create(&f.ctx, input).await.unwrap().client.id;

        f.service.deactivate(&f.ctx, id).await.unwrap();
        let loaded = f.service.get(&f.ctx, id).await.unwrap();
        assert!(!loaded.client.is_active);
        assert!(loaded.addresses.is_empty());
        assert!(loaded.documents.is_empty());

        let history = f.reader.list_for_client(&f.ctx, id).await.unwrap();
        let entry = &history[1];
        assert_eq!(entry.action, AuditAction::Deactivate);
        assert_eq!(entry.new_values, Some(Map::from_iter([("is_active".to_string(), json!(false))])));
        let old = entry.old_values.as_ref().unwrap();
        assert_eq!(old.get("name"), Some(&json!("Ana")));
        assert_eq!(old["addresses"].as_array().map(Vec::len), Some(1));

        let err = f.service.deactivate(&f.ctx, id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(audit_count(&f.db, id).await, 2);
    }

    #[tokio::test]
    async fn test_too_many_addresses_rejected_before_write() {
        let f = fixture();
        let mut input = ana();
        input.addresses = (0..5)
            .map(|i| NewAddress {
                address: format!("Calle {i}"),
                postal_code: None,
                country: None,
            })
            .collect();

        let err = f.service.create(&f.ctx, input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.field_errors.unwrap().contains_key("addresses"));
        assert!(f.service.list(&f.ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_client_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update(&f.ctx, 99, ClientPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = f.reader.list_for_client(&f.ctx, 99).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    fn rename(name: &str) -> ClientPatch {
        ClientPatch {
            changes: ClientChanges {
                name: Some(name.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_of_inactive_client_is_audited() {
        let f = fixture();
        let id = f.service.create(&f.ctx, ana()).await.unwrap().client.id;
        f.service.deactivate(&f.ctx, id).await.unwrap();

        let updated = f.service.update(&f.ctx, id, rename("Anna")).await.unwrap();
        assert_eq!(updated.client.name, "Anna");
        assert!(!updated.client.is_active);

        let history = f.reader.list_for_client(&f.ctx, id).await.unwrap();
        let actions: Vec<AuditAction> = history.iter().map(|v| v.action).collect();
        assert_eq!(
            actions,
            vec![AuditAction::Create, AuditAction::Deactivate, AuditAction::Update]
        );
        let keys: Vec<&str> = history[2].changes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name"]);
    }

    mod rollback {
        use super::*;
        use crate::testing::FlakyAuditDatabase;

        fn flaky_fixture() -> (FlakyAuditDatabase, Fixture) {
            let flaky = FlakyAuditDatabase::new();
            let db: Arc<dyn Database> = Arc::new(flaky.clone());
            let rbac = Arc::new(RbacEnforcer::new());
            let f = Fixture {
                service: ClientService::new(Arc::clone(&db), Arc::clone(&rbac), AuditWriter::new()),
                reader: AuditReader::new(Arc::clone(&db), rbac),
                db,
                ctx: RequestContext::new(1, Uuid::new_v4(), UserRole::Employee, "Maria".into()),
            };
            (flaky, f)
        }

        #[tokio::test]
        async fn test_failed_audit_discards_created_client() {
            let (flaky, f) = flaky_fixture();
            flaky.fail_audits(true);

            let mut input = ana();
            input.addresses = vec![NewAddress {
                address: "Calle 1".into(),
                postal_code: None,
                country: None,
            }];
            let err = f.service.create(&f.ctx, input).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Database);

            flaky.fail_audits(false);
            assert!(f.service.list(&f.ctx).await.unwrap().is_empty());
            let mut uow = f.db.begin().await.unwrap();
            assert!(uow.list_addresses(&[1]).await.unwrap().is_empty());
            assert!(uow.list_audits(1).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_failed_audit_discards_update() {
            let (flaky, f) = flaky_fixture();
            let id = f.service.create(&f.ctx, ana()).await.unwrap().client.id;

            flaky.fail_audits(true);
            let err = f.service.update(&f.ctx, id, rename("Anna")).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Database);

            flaky.fail_audits(false);
            let loaded = f.service.get(&f.ctx, id).await.unwrap();
            assert_eq!(loaded.client.name, "Ana");
            assert_eq!(audit_count(&f.db, id).await, 1);
        }

        #[tokio::test]
        async fn test_failed_audit_keeps_client_active() {
            let (flaky, f) = flaky_fixture();
            let mut input = ana();
            input.documents = vec![NewDocument {
                document_type: DocumentType::Passport,
                document_number: "A123".into(),
            }];
            let id = f.service.create(&f.ctx, input).await.unwrap().client.id;

            flaky.fail_audits(true);
            f.service.deactivate(&f.ctx, id).await.unwrap_err();

            flaky.fail_audits(false);
            let loaded = f.service.get(&f.ctx, id).await.unwrap();
            assert!(loaded.client.is_active);
            assert_eq!(loaded.documents.len(), 1);
        }
    }
}
