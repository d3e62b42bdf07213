//! Number repository implementation
//!
//! Provides PostgreSQL-backed storage for numbers with value-fragment search
//! and collection-day listings. User scoping goes through the owning client.

use async_trait::async_trait;
use simledger_core::{
    models::{CollectionDay, Number, SimStatus},
    traits::{NumberRepository, Repository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of NumberRepository
pub struct PgNumberRepository {
    pool: PgPool,
}

impl PgNumberRepository {
    /// Create a new number repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database SIM status string to enum
    fn parse_sim_status(s: &str) -> SimStatus {
        SimStatus::from_str(s).unwrap_or(SimStatus::Active)
    }

    /// Convert database collection day string to enum
    fn parse_collection_day(s: &str) -> CollectionDay {
        CollectionDay::from_str(s).unwrap_or(CollectionDay::Monday)
    }
}

const NUMBER_COLUMNS: &str = r#"
    id, value, sim_status, operator_id,
    client_id, handler_id, collection_day
"#;

#[async_trait]
impl Repository<Number, Uuid> for PgNumberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Number>> {
        debug!("Finding number by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            "SELECT {} FROM numbers WHERE id = $1",
            NUMBER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding number {}: {}", id, e);
            AppError::Database(format!("Failed to find number: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Number>> {
        let rows = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            "SELECT {} FROM numbers ORDER BY value LIMIT $1 OFFSET $2",
            NUMBER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding numbers: {}", e);
            AppError::Database(format!("Failed to fetch numbers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM numbers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting numbers: {}", e);
                AppError::Database(format!("Failed to count numbers: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Number) -> AppResult<Number> {
        debug!("Creating number: {}", entity.value);

        let row = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            r#"
            INSERT INTO numbers (
                id, value, sim_status, operator_id,
                client_id, handler_id, collection_day
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            NUMBER_COLUMNS
        ))
        .bind(entity.id)
        .bind(&entity.value)
        .bind(entity.sim_status.to_string())
        .bind(entity.operator_id)
        .bind(entity.client_id)
        .bind(entity.handler_id)
        .bind(entity.collection_day.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating number: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!("Number {} already exists", entity.value))
            } else {
                AppError::Database(format!("Failed to create number: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Number) -> AppResult<Number> {
        debug!("Updating number: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            r#"
            UPDATE numbers
            SET sim_status = $2,
                handler_id = $3,
                collection_day = $4
            WHERE id = $1
            RETURNING {}
            "#,
            NUMBER_COLUMNS
        ))
        .bind(entity.id)
        .bind(entity.sim_status.to_string())
        .bind(entity.handler_id)
        .bind(entity.collection_day.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating number {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update number: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting number: {}", id);

        // Invoice/payment rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM numbers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting number {}: {}", id, e);
                AppError::Database(format!("Failed to delete number: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NumberRepository for PgNumberRepository {
    #[instrument(skip(self))]
    async fn find_by_value(&self, value: &str) -> AppResult<Option<Number>> {
        debug!("Finding number by value: {}", value);

        let result = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            "SELECT {} FROM numbers WHERE value = $1",
            NUMBER_COLUMNS
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding number by value: {}", e);
            AppError::Database(format!("Failed to find number: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_for_client(
        &self,
        client_id: Uuid,
        value_fragment: Option<&str>,
        operator_id: Option<i32>,
    ) -> AppResult<Vec<Number>> {
        debug!(
            "Listing numbers for client {} fragment={:?} operator={:?}",
            client_id, value_fragment, operator_id
        );

        let rows = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            r#"
            SELECT {}
            FROM numbers
            WHERE client_id = $1
              AND ($2::text IS NULL OR value LIKE '%' || $2 || '%')
              AND ($3::int IS NULL OR operator_id = $3)
            ORDER BY value
            "#,
            NUMBER_COLUMNS
        ))
        .bind(client_id)
        .bind(value_fragment)
        .bind(operator_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing numbers for client: {}", e);
            AppError::Database(format!("Failed to fetch numbers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn search_for_user(
        &self,
        user_id: i32,
        value_fragment: &str,
    ) -> AppResult<Vec<Number>> {
        debug!("Searching numbers for user {}: {}", user_id, value_fragment);

        let rows = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            r#"
            SELECT {}
            FROM numbers n
            WHERE n.client_id IN (SELECT id FROM clients WHERE user_id = $1)
              AND n.value LIKE '%' || $2 || '%'
            ORDER BY n.value
            "#,
            NUMBER_COLUMNS
        ))
        .bind(user_id)
        .bind(value_fragment)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error searching numbers: {}", e);
            AppError::Database(format!("Failed to search numbers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Number>> {
        let rows = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            r#"
            SELECT {}
            FROM numbers n
            WHERE n.client_id IN (SELECT id FROM clients WHERE user_id = $1)
            ORDER BY n.value
            "#,
            NUMBER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing numbers for user {}: {}", user_id, e);
            AppError::Database(format!("Failed to fetch numbers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_collection_day(
        &self,
        user_id: i32,
        day: CollectionDay,
    ) -> AppResult<Vec<Number>> {
        debug!("Listing numbers for user {} due on {}", user_id, day);

        let rows = sqlx::query_as::<sqlx::Postgres, NumberRow>(&format!(
            r#"
            SELECT {}
            FROM numbers n
            WHERE n.client_id IN (SELECT id FROM clients WHERE user_id = $1)
              AND n.collection_day = $2
              AND n.sim_status = 'Active'
            ORDER BY n.value
            "#,
            NUMBER_COLUMNS
        ))
        .bind(user_id)
        .bind(day.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing collection-day numbers: {}", e);
            AppError::Database(format!("Failed to fetch numbers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct NumberRow {
    id: Uuid,
    value: String,
    sim_status: String,
    operator_id: i32,
    client_id: Uuid,
    handler_id: i32,
    collection_day: String,
}

impl From<NumberRow> for Number {
    fn from(row: NumberRow) -> Self {
        Self {
            id: row.id,
            value: row.value,
            sim_status: PgNumberRepository::parse_sim_status(&row.sim_status),
            operator_id: row.operator_id,
            client_id: row.client_id,
            handler_id: row.handler_id,
            collection_day: PgNumberRepository::parse_collection_day(&row.collection_day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sim_status() {
        assert_eq!(
            PgNumberRepository::parse_sim_status("Disabled"),
            SimStatus::Disabled
        );
        assert_eq!(PgNumberRepository::parse_sim_status("?"), SimStatus::Active);
    }

    #[test]
    fn test_parse_collection_day() {
        assert_eq!(
            PgNumberRepository::parse_collection_day("Friday"),
            CollectionDay::Friday
        );
        assert_eq!(
            PgNumberRepository::parse_collection_day("?"),
            CollectionDay::Monday
        );
    }
}
