//! Client repository implementation
//!
//! Provides PostgreSQL-backed storage for clients and their handlers. All
//! listing queries are scoped to the owning back-office user.

use async_trait::async_trait;
use chrono::NaiveDate;
use simledger_core::{
    models::{Client, ClientStatus, Handler},
    traits::{ClientRepository, Repository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of ClientRepository
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    /// Create a new client repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database status string to enum
    fn parse_status(s: &str) -> ClientStatus {
        ClientStatus::from_str(s).unwrap_or(ClientStatus::Active)
    }
}

const CLIENT_COLUMNS: &str = r#"
    id, name, trade_name, contact_number,
    status, primary_address_id, application_date, user_id
"#;

#[async_trait]
impl Repository<Client, Uuid> for PgClientRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>> {
        debug!("Finding client by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ClientRow>(&format!(
            "SELECT {} FROM clients WHERE id = $1",
            CLIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding client {}: {}", id, e);
            AppError::Database(format!("Failed to find client: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<sqlx::Postgres, ClientRow>(&format!(
            "SELECT {} FROM clients ORDER BY name LIMIT $1 OFFSET $2",
            CLIENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding clients: {}", e);
            AppError::Database(format!("Failed to fetch clients: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting clients: {}", e);
                AppError::Database(format!("Failed to count clients: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Client) -> AppResult<Client> {
        debug!("Creating client: {}", entity.name);

        let row = sqlx::query_as::<sqlx::Postgres, ClientRow>(&format!(
            r#"
            INSERT INTO clients (
                id, name, trade_name, contact_number,
                status, primary_address_id, application_date, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        ))
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.trade_name)
        .bind(&entity.contact_number)
        .bind(entity.status.to_string())
        .bind(entity.primary_address_id)
        .bind(entity.application_date)
        .bind(entity.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating client: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!("Client {} already exists", entity.name))
            } else {
                AppError::Database(format!("Failed to create client: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Client) -> AppResult<Client> {
        debug!("Updating client: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, ClientRow>(&format!(
            r#"
            UPDATE clients
            SET name = $2,
                trade_name = $3,
                contact_number = $4,
                status = $5,
                primary_address_id = $6,
                application_date = $7
            WHERE id = $1
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        ))
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.trade_name)
        .bind(&entity.contact_number)
        .bind(entity.status.to_string())
        .bind(entity.primary_address_id)
        .bind(entity.application_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating client {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update client: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting client: {}", id);

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting client {}: {}", id, e);
                AppError::Database(format!("Failed to delete client: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Client>> {
        debug!("Listing clients for user: {}", user_id);

        let rows = sqlx::query_as::<sqlx::Postgres, ClientRow>(&format!(
            "SELECT {} FROM clients WHERE user_id = $1 ORDER BY name",
            CLIENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing clients for user {}: {}", user_id, e);
            AppError::Database(format!("Failed to fetch clients: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn search_by_name(&self, user_id: i32, query: &str) -> AppResult<Vec<Client>> {
        debug!("Searching clients for user {} with query: {}", user_id, query);

        let rows = sqlx::query_as::<sqlx::Postgres, ClientRow>(&format!(
            r#"
            SELECT {}
            FROM clients
            WHERE user_id = $1
              AND (name ILIKE $2 OR trade_name ILIKE $2)
            ORDER BY name
            "#,
            CLIENT_COLUMNS
        ))
        .bind(user_id)
        .bind(format!("%{}%", query.trim()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error searching clients: {}", e);
            AppError::Database(format!("Failed to search clients: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, handler))]
    async fn create_handler(&self, handler: &Handler) -> AppResult<Handler> {
        debug!("Creating handler for client: {}", handler.client_id);

        let row = sqlx::query_as::<sqlx::Postgres, HandlerRow>(
            r#"
            INSERT INTO handlers (name, contact, client_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, contact, client_id
            "#,
        )
        .bind(&handler.name)
        .bind(&handler.contact)
        .bind(handler.client_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating handler: {}", e);
            AppError::Database(format!("Failed to create handler: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, handler))]
    async fn update_handler(&self, handler: &Handler) -> AppResult<Handler> {
        debug!("Updating handler: {}", handler.id);

        let row = sqlx::query_as::<sqlx::Postgres, HandlerRow>(
            r#"
            UPDATE handlers
            SET name = $2, contact = $3
            WHERE id = $1
            RETURNING id, name, contact, client_id
            "#,
        )
        .bind(handler.id)
        .bind(&handler.name)
        .bind(&handler.contact)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating handler {}: {}", handler.id, e);
            AppError::Database(format!("Failed to update handler: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn handlers_for_client(&self, client_id: Uuid) -> AppResult<Vec<Handler>> {
        let rows = sqlx::query_as::<sqlx::Postgres, HandlerRow>(
            "SELECT id, name, contact, client_id FROM handlers WHERE client_id = $1 ORDER BY name",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing handlers for {}: {}", client_id, e);
            AppError::Database(format!("Failed to fetch handlers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    trade_name: String,
    contact_number: String,
    status: String,
    primary_address_id: Option<i32>,
    application_date: NaiveDate,
    user_id: i32,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            trade_name: row.trade_name,
            contact_number: row.contact_number,
            status: PgClientRepository::parse_status(&row.status),
            primary_address_id: row.primary_address_id,
            application_date: row.application_date,
            user_id: row.user_id,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HandlerRow {
    id: i32,
    name: String,
    contact: String,
    client_id: Uuid,
}

impl From<HandlerRow> for Handler {
    fn from(row: HandlerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact: row.contact,
            client_id: row.client_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(
            PgClientRepository::parse_status("inactive"),
            ClientStatus::Inactive
        );
        assert_eq!(
            PgClientRepository::parse_status("bogus"),
            ClientStatus::Active
        );
    }
}
