//! Client, address and document statements.

use async_trait::async_trait;

use clientdesk_core::result::AppResult;
use clientdesk_entity::client::{Address, Client, Document, NewAddress, NewClient, NewDocument};

use super::{PgUnitOfWork, db_error};
use crate::store::{AddressRepository, ClientRepository, DocumentRepository};

#[async_trait]
impl ClientRepository for PgUnitOfWork {
    async fn list_clients(&mut self) -> AppResult<Vec<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to list clients"))
    }

    async fn find_client(&mut self, id: i64) -> AppResult<Option<Client>> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to find client"))
    }

    async fn insert_client(&mut self, client: &NewClient) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"INSERT INTO clients (name, last_name, email, phone)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(&client.name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to create client"))
    }

    async fn save_client(&mut self, client: &Client) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"UPDATE clients
               SET name = $2, last_name = $3, email = $4, phone = $5,
                   is_active = $6, updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(client.id)
        .bind(&client.name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.is_active)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to save client"))
    }
}

#[async_trait]
impl AddressRepository for PgUnitOfWork {
    async fn list_addresses(&mut self, client_ids: &[i64]) -> AppResult<Vec<Address>> {
        sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE client_id = ANY($1) ORDER BY id")
            .bind(client_ids)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to list addresses"))
    }

    async fn insert_address(
        &mut self,
        client_id: i64,
        address: &NewAddress,
    ) -> AppResult<Address> {
        sqlx::query_as::<_, Address>(
            r#"INSERT INTO addresses (client_id, address, postal_code, country)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(client_id)
        .bind(&address.address)
        .bind(&address.postal_code)
        .bind(address.country_or_default())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to create address"))
    }

    async fn delete_addresses(&mut self, client_id: i64) -> AppResult<u64> {
        sqlx::query("DELETE FROM addresses WHERE client_id = $1")
            .bind(client_id)
            .execute(&mut *self.tx)
            .await
            .map(|r| r.rows_affected())
            .map_err(db_error("Failed to delete addresses"))
    }
}

#[async_trait]
impl DocumentRepository for PgUnitOfWork {
    async fn list_documents(&mut self, client_ids: &[i64]) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE client_id = ANY($1) ORDER BY id")
            .bind(client_ids)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to list documents"))
    }

    async fn insert_document(
        &mut self,
        client_id: i64,
        document: &NewDocument,
    ) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            r#"INSERT INTO documents (client_id, document_type, document_number)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(client_id)
        .bind(document.document_type)
        .bind(&document.document_number)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to create document"))
    }

    async fn delete_documents(&mut self, client_id: i64) -> AppResult<u64> {
        sqlx::query("DELETE FROM documents WHERE client_id = $1")
            .bind(client_id)
            .execute(&mut *self.tx)
            .await
            .map(|r| r.rows_affected())
            .map_err(db_error("Failed to delete documents"))
    }
}
