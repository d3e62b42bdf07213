//! Ledger repository implementation
//!
//! Provides PostgreSQL-backed storage for invoice and payment rows. Both
//! tables are append-and-fetch only; rows are removed solely by the number
//! cascade.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use simledger_core::{
    models::{Invoice, Payment},
    traits::LedgerRepository,
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of LedgerRepository
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    /// Create a new ledger repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self))]
    async fn invoices_for(&self, number_id: Uuid) -> AppResult<Vec<Invoice>> {
        debug!("Fetching invoices for number: {}", number_id);

        let rows = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(
            r#"
            SELECT id, number_id, time, added_load, balance, reference_number
            FROM invoices
            WHERE number_id = $1
            ORDER BY id
            "#,
        )
        .bind(number_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching invoices for {}: {}", number_id, e);
            AppError::Database(format!("Failed to fetch invoices: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn payments_for(&self, number_id: Uuid) -> AppResult<Vec<Payment>> {
        debug!("Fetching payments for number: {}", number_id);

        let rows = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            SELECT id, number_id, time, paid_amount
            FROM payments
            WHERE number_id = $1
            ORDER BY id
            "#,
        )
        .bind(number_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching payments for {}: {}", number_id, e);
            AppError::Database(format!("Failed to fetch payments: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, invoice))]
    async fn add_invoice(&self, invoice: &Invoice) -> AppResult<Invoice> {
        debug!("Appending invoice for number: {}", invoice.number_id);

        let row = sqlx::query_as::<sqlx::Postgres, InvoiceRow>(
            r#"
            INSERT INTO invoices (number_id, time, added_load, balance, reference_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, number_id, time, added_load, balance, reference_number
            "#,
        )
        .bind(invoice.number_id)
        .bind(invoice.time)
        .bind(invoice.added_load)
        .bind(invoice.balance)
        .bind(&invoice.reference_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating invoice: {}", e);
            AppError::Database(format!("Failed to create invoice: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, payment))]
    async fn add_payment(&self, payment: &Payment) -> AppResult<Payment> {
        debug!("Appending payment for number: {}", payment.number_id);

        let row = sqlx::query_as::<sqlx::Postgres, PaymentRow>(
            r#"
            INSERT INTO payments (number_id, time, paid_amount)
            VALUES ($1, $2, $3)
            RETURNING id, number_id, time, paid_amount
            "#,
        )
        .bind(payment.number_id)
        .bind(payment.time)
        .bind(payment.paid_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating payment: {}", e);
            AppError::Database(format!("Failed to create payment: {}", e))
        })?;

        Ok(row.into())
    }
}

/// Helper struct for mapping invoice rows
#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    number_id: Uuid,
    time: DateTime<Utc>,
    added_load: Decimal,
    balance: Decimal,
    reference_number: String,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            number_id: row.number_id,
            time: row.time,
            added_load: row.added_load,
            balance: row.balance,
            reference_number: row.reference_number,
        }
    }
}

/// Helper struct for mapping payment rows
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    number_id: Uuid,
    time: DateTime<Utc>,
    paid_amount: Decimal,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            number_id: row.number_id,
            time: row.time,
            paid_amount: row.paid_amount,
        }
    }
}
