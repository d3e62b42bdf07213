//! Prefix table repository implementation
//!
//! Provides PostgreSQL-backed storage for operators and their prefix rows.
//! Lookups are exact matches; width precedence lives in the resolver.

use async_trait::async_trait;
use simledger_core::{
    models::{Operator, PrefixEntry},
    traits::PrefixRepository,
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};

/// PostgreSQL implementation of PrefixRepository
pub struct PgPrefixRepository {
    pool: PgPool,
}

impl PgPrefixRepository {
    /// Create a new prefix repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrefixRepository for PgPrefixRepository {
    #[instrument(skip(self))]
    async fn find_by_prefix(&self, prefix: &str) -> AppResult<Option<PrefixEntry>> {
        debug!("Looking up prefix: {}", prefix);

        let result = sqlx::query_as::<sqlx::Postgres, PrefixRow>(
            "SELECT id, prefix, operator_id FROM prefixes WHERE prefix = $1",
        )
        .bind(prefix)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error looking up prefix {}: {}", prefix, e);
            AppError::Database(format!("Failed to look up prefix: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_operator(&self, id: i32) -> AppResult<Option<Operator>> {
        let result = sqlx::query_as::<sqlx::Postgres, OperatorRow>(
            "SELECT id, name FROM operators WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding operator {}: {}", id, e);
            AppError::Database(format!("Failed to find operator: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_operators(&self) -> AppResult<Vec<Operator>> {
        let rows = sqlx::query_as::<sqlx::Postgres, OperatorRow>(
            "SELECT id, name FROM operators ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing operators: {}", e);
            AppError::Database(format!("Failed to fetch operators: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, seed))]
    async fn seed_operators(&self, seed: &[(&str, &[&str])]) -> AppResult<()> {
        info!("Seeding {} operators", seed.len());

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin seed transaction: {}", e);
            AppError::Database(format!("Failed to begin transaction: {}", e))
        })?;

        for (name, prefixes) in seed {
            let operator_id: (i32,) = sqlx::query_as(
                r#"
                INSERT INTO operators (name)
                VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error seeding operator {}: {}", name, e);
                AppError::Database(format!("Failed to seed operator: {}", e))
            })?;

            for prefix in *prefixes {
                sqlx::query(
                    r#"
                    INSERT INTO prefixes (prefix, operator_id)
                    VALUES ($1, $2)
                    ON CONFLICT (prefix) DO NOTHING
                    "#,
                )
                .bind(prefix)
                .bind(operator_id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Database error seeding prefix {}: {}", prefix, e);
                    AppError::Database(format!("Failed to seed prefix: {}", e))
                })?;
            }
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit seed transaction: {}", e);
            AppError::Database(format!("Failed to commit transaction: {}", e))
        })?;

        info!("Operator seed complete");
        Ok(())
    }
}

/// Helper struct for mapping prefix rows
#[derive(Debug, sqlx::FromRow)]
struct PrefixRow {
    id: i32,
    prefix: String,
    operator_id: i32,
}

impl From<PrefixRow> for PrefixEntry {
    fn from(row: PrefixRow) -> Self {
        Self {
            id: row.id,
            prefix: row.prefix,
            operator_id: row.operator_id,
        }
    }
}

/// Helper struct for mapping operator rows
#[derive(Debug, sqlx::FromRow)]
struct OperatorRow {
    id: i32,
    name: String,
}

impl From<OperatorRow> for Operator {
    fn from(row: OperatorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
