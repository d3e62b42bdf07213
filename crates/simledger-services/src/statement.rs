//! Statement assembly
//!
//! A statement covers whole UTC calendar days, both endpoints inclusive.
//! Its opening balance is the number's derived balance just before the
//! range starts, so consecutive statements chain without gaps.

use crate::constants::STATEMENT_DATE_FORMAT;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use simledger_core::{
    models::HistoryEntry,
    traits::LedgerRepository,
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Parse and validate a statement date range
///
/// Both dates must be `YYYY-MM-DD`; the start must not be after the end.
///
/// # Errors
///
/// Returns `AppError::InvalidDateRange` naming the offending input.
pub fn parse_range(start: &str, end: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::parse_from_str(start.trim(), STATEMENT_DATE_FORMAT)
        .map_err(|_| AppError::InvalidDateRange(format!("Invalid start date: {}", start.trim())))?;
    let end = NaiveDate::parse_from_str(end.trim(), STATEMENT_DATE_FORMAT)
        .map_err(|_| AppError::InvalidDateRange(format!("Invalid end date: {}", end.trim())))?;

    if start > end {
        return Err(AppError::InvalidDateRange(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }

    Ok((start, end))
}

/// Assembled statement data for one number over one date range
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub number_id: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub opening_balance: Decimal,
    /// In-range entries in ascending time order
    pub entries: Vec<HistoryEntry>,
    pub total_invoiced: Decimal,
    pub total_paid: Decimal,
    pub closing_balance: Decimal,
}

/// Statement reads over an injected ledger store
pub struct StatementService<L: LedgerRepository> {
    ledger: Arc<L>,
}

impl<L: LedgerRepository> StatementService<L> {
    /// Create a new statement service
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Assemble a statement for a number over an inclusive date range
    ///
    /// Entries strictly before the range feed the opening balance; entries
    /// inside it are listed and totalled; entries after it are ignored.
    /// `closing = opening + invoiced − paid` holds by construction.
    #[instrument(skip(self))]
    pub async fn assemble(
        &self,
        number_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Statement> {
        let range_start = start.and_time(NaiveTime::MIN).and_utc();
        let range_end = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::InvalidDateRange(format!("End date {} out of range", end)))?
            .and_time(NaiveTime::MIN)
            .and_utc();

        let invoices = self.ledger.invoices_for(number_id).await?;
        let payments = self.ledger.payments_for(number_id).await?;

        let opening_invoiced: Decimal = invoices
            .iter()
            .filter(|i| i.time < range_start)
            .map(|i| i.balance)
            .sum();
        let opening_paid: Decimal = payments
            .iter()
            .filter(|p| p.time < range_start)
            .map(|p| p.paid_amount)
            .sum();
        let opening_balance = opening_invoiced - opening_paid;

        let in_range = |time: DateTime<Utc>| time >= range_start && time < range_end;

        let mut entries: Vec<HistoryEntry> = invoices
            .iter()
            .filter(|i| in_range(i.time))
            .map(HistoryEntry::from_invoice)
            .chain(
                payments
                    .iter()
                    .filter(|p| in_range(p.time))
                    .map(HistoryEntry::from_payment),
            )
            .collect();
        entries.sort_by_key(|entry| entry.time);

        let total_invoiced: Decimal = invoices
            .iter()
            .filter(|i| in_range(i.time))
            .map(|i| i.balance)
            .sum();
        let total_paid: Decimal = payments
            .iter()
            .filter(|p| in_range(p.time))
            .map(|p| p.paid_amount)
            .sum();

        let closing_balance = opening_balance + total_invoiced - total_paid;

        debug!(
            %number_id,
            entries = entries.len(),
            %opening_balance,
            %closing_balance,
            "Assembled statement"
        );

        Ok(Statement {
            number_id,
            start,
            end,
            opening_balance,
            entries,
            total_invoiced,
            total_paid,
            closing_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use simledger_core::models::{EntryKind, Invoice, Payment};

    struct MockLedgerRepository {
        invoices: Vec<Invoice>,
        payments: Vec<Payment>,
    }

    #[async_trait]
    impl LedgerRepository for MockLedgerRepository {
        async fn invoices_for(&self, _number_id: Uuid) -> AppResult<Vec<Invoice>> {
            Ok(self.invoices.clone())
        }

        async fn payments_for(&self, _number_id: Uuid) -> AppResult<Vec<Payment>> {
            Ok(self.payments.clone())
        }

        async fn add_invoice(&self, _invoice: &Invoice) -> AppResult<Invoice> {
            Err(AppError::Internal("not used".to_string()))
        }

        async fn add_payment(&self, _payment: &Payment) -> AppResult<Payment> {
            Err(AppError::Internal("not used".to_string()))
        }
    }

    fn invoice(id: i64, day: u32, amount: Decimal) -> Invoice {
        Invoice {
            id,
            number_id: Uuid::nil(),
            time: Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap(),
            added_load: amount,
            balance: amount,
            reference_number: format!("REF-{}", id),
        }
    }

    fn payment(id: i64, day: u32, amount: Decimal) -> Payment {
        Payment {
            id,
            number_id: Uuid::nil(),
            time: Utc.with_ymd_and_hms(2024, 6, day, 15, 0, 0).unwrap(),
            paid_amount: amount,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_parse_range_accepts_iso_dates() {
        let (start, end) = parse_range("2024-06-01", "2024-06-30").unwrap();
        assert_eq!(start, date(1));
        assert_eq!(end, date(30));
    }

    #[test]
    fn test_parse_range_accepts_single_day() {
        let (start, end) = parse_range("2024-06-15", "2024-06-15").unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn test_parse_range_rejects_garbage() {
        assert!(matches!(
            parse_range("June 1st", "2024-06-30"),
            Err(AppError::InvalidDateRange(_))
        ));
        assert!(matches!(
            parse_range("2024-06-01", "30/06/2024"),
            Err(AppError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn test_parse_range_rejects_inverted_range() {
        assert!(matches!(
            parse_range("2024-06-30", "2024-06-01"),
            Err(AppError::InvalidDateRange(_))
        ));
    }

    #[tokio::test]
    async fn test_statement_splits_before_and_in_range() {
        let service = StatementService::new(Arc::new(MockLedgerRepository {
            invoices: vec![
                invoice(1, 1, dec!(500.00)),  // before range
                invoice(2, 10, dec!(200.00)), // in range
                invoice(3, 25, dec!(100.00)), // after range
            ],
            payments: vec![
                payment(1, 2, dec!(150.00)), // before range
                payment(2, 12, dec!(50.00)), // in range
            ],
        }));

        let statement = service
            .assemble(Uuid::nil(), date(5), date(20))
            .await
            .unwrap();

        assert_eq!(statement.opening_balance, dec!(350.00));
        assert_eq!(statement.entries.len(), 2);
        assert_eq!(statement.total_invoiced, dec!(200.00));
        assert_eq!(statement.total_paid, dec!(50.00));
        assert_eq!(statement.closing_balance, dec!(500.00));
    }

    #[tokio::test]
    async fn test_range_endpoints_are_inclusive() {
        let service = StatementService::new(Arc::new(MockLedgerRepository {
            invoices: vec![invoice(1, 5, dec!(10.00)), invoice(2, 20, dec!(20.00))],
            payments: vec![],
        }));

        let statement = service
            .assemble(Uuid::nil(), date(5), date(20))
            .await
            .unwrap();

        assert_eq!(statement.entries.len(), 2);
        assert_eq!(statement.total_invoiced, dec!(30.00));
    }

    #[tokio::test]
    async fn test_entries_sorted_ascending_by_time() {
        let service = StatementService::new(Arc::new(MockLedgerRepository {
            invoices: vec![invoice(1, 18, dec!(10.00)), invoice(2, 6, dec!(20.00))],
            payments: vec![payment(1, 12, dec!(5.00))],
        }));

        let statement = service
            .assemble(Uuid::nil(), date(1), date(30))
            .await
            .unwrap();

        let days: Vec<u32> = statement
            .entries
            .iter()
            .map(|e| {
                use chrono::Datelike;
                e.time.day()
            })
            .collect();
        assert_eq!(days, vec![6, 12, 18]);
        assert_eq!(statement.entries[1].kind, EntryKind::Payment);
    }

    #[tokio::test]
    async fn test_empty_ledger_statement() {
        let service = StatementService::new(Arc::new(MockLedgerRepository {
            invoices: vec![],
            payments: vec![],
        }));

        let statement = service
            .assemble(Uuid::nil(), date(1), date(30))
            .await
            .unwrap();

        assert_eq!(statement.opening_balance, dec!(0));
        assert!(statement.entries.is_empty());
        assert_eq!(statement.closing_balance, dec!(0));
    }
}
