//! Unified invoice/payment history
//!
//! `merge_history` projects a number's two ledgers into one sequence of
//! `HistoryEntry` rows, invoices first, payments second, each side in its
//! storage iteration order. That concatenation order is never surfaced
//! unsorted, but it is the stable baseline when a requested sort key ties.
//!
//! `HistoryService::page` then applies the fixed pipeline the history table
//! exposes: filter, stable sort, clamped pagination - strictly in that order.

use crate::constants::HISTORY_PAGE_SIZE;
use simledger_core::{
    models::HistoryEntry,
    traits::LedgerRepository,
    AppResult,
};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Sort keys accepted by the history table
///
/// Unrecognized tokens fall back to the default `TimeDesc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    TimeDesc,
    TimeAsc,
    AmountDesc,
    AmountAsc,
    TypeAsc,
    TypeDesc,
}

impl SortKey {
    /// Parse a query-string token, falling back to the default
    pub fn parse(token: &str) -> Self {
        match token {
            "time_desc" => SortKey::TimeDesc,
            "time_asc" => SortKey::TimeAsc,
            "amount_desc" => SortKey::AmountDesc,
            "amount_asc" => SortKey::AmountAsc,
            "type_asc" => SortKey::TypeAsc,
            "type_desc" => SortKey::TypeDesc,
            _ => SortKey::default(),
        }
    }

    /// The token form, for echoing back to the presentation layer
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::TimeDesc => "time_desc",
            SortKey::TimeAsc => "time_asc",
            SortKey::AmountDesc => "amount_desc",
            SortKey::AmountAsc => "amount_asc",
            SortKey::TypeAsc => "type_asc",
            SortKey::TypeDesc => "type_desc",
        }
    }

    fn compare(&self, a: &HistoryEntry, b: &HistoryEntry) -> Ordering {
        let ordering = match self {
            SortKey::TimeDesc | SortKey::TimeAsc => a.time.cmp(&b.time),
            SortKey::AmountDesc | SortKey::AmountAsc => a.amount.cmp(&b.amount),
            SortKey::TypeDesc | SortKey::TypeAsc => a.kind.cmp(&b.kind),
        };

        match self {
            SortKey::TimeDesc | SortKey::AmountDesc | SortKey::TypeDesc => ordering.reverse(),
            _ => ordering,
        }
    }
}

/// One page of the filtered, sorted history
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub items: Vec<HistoryEntry>,
    pub page_number: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Filter, sort, and paginate a merged history
///
/// Pure over its input; every call recomputes from the full sequence. The
/// page number is 1-indexed and clamped into the valid range - below 1
/// yields page 1, beyond the end yields the last page. An empty result
/// still has one (empty) page.
pub fn query(
    mut history: Vec<HistoryEntry>,
    search: &str,
    sort: SortKey,
    page: i64,
    page_size: usize,
) -> HistoryPage {
    // Filter
    let search = search.trim().to_lowercase();
    if !search.is_empty() {
        history.retain(|entry| {
            entry.reference.to_lowercase().contains(&search)
                || entry.time.to_string().to_lowercase().contains(&search)
        });
    }

    // Stable sort; ties keep their filtered relative order
    history.sort_by(|a, b| sort.compare(a, b));

    // Paginate with clamping
    let total_pages = history.len().div_ceil(page_size).max(1);
    let page_number = page.clamp(1, total_pages as i64) as usize;

    let start = (page_number - 1) * page_size;
    let items: Vec<HistoryEntry> = history.into_iter().skip(start).take(page_size).collect();

    HistoryPage {
        items,
        page_number,
        total_pages,
        has_previous: page_number > 1,
        has_next: page_number < total_pages,
    }
}

/// History reads over an injected ledger store
pub struct HistoryService<L: LedgerRepository> {
    ledger: Arc<L>,
    page_size: usize,
}

impl<L: LedgerRepository> HistoryService<L> {
    /// Create a history service with the default page size of 10
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            page_size: HISTORY_PAGE_SIZE,
        }
    }

    /// Override the page size (config-driven)
    pub fn with_page_size(ledger: Arc<L>, page_size: usize) -> Self {
        Self { ledger, page_size }
    }

    /// Merge a number's ledgers into the pre-sort history sequence
    ///
    /// Invoice entries precede payment entries; each side keeps its storage
    /// iteration order. Length always equals invoice count + payment count.
    #[instrument(skip(self))]
    pub async fn merge_history(&self, number_id: Uuid) -> AppResult<Vec<HistoryEntry>> {
        let invoices = self.ledger.invoices_for(number_id).await?;
        let payments = self.ledger.payments_for(number_id).await?;

        let mut history = Vec::with_capacity(invoices.len() + payments.len());
        history.extend(invoices.iter().map(HistoryEntry::from_invoice));
        history.extend(payments.iter().map(HistoryEntry::from_payment));

        debug!(
            %number_id,
            invoices = invoices.len(),
            payments = payments.len(),
            "Merged ledger history"
        );

        Ok(history)
    }

    /// One page of a number's history after filter and sort
    #[instrument(skip(self))]
    pub async fn page(
        &self,
        number_id: Uuid,
        search: &str,
        sort: SortKey,
        page: i64,
    ) -> AppResult<HistoryPage> {
        let history = self.merge_history(number_id).await?;
        Ok(query(history, search, sort, page, self.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use simledger_core::models::{EntryKind, Invoice, Payment};
    use simledger_core::AppError;

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

    fn entry(kind: EntryKind, minute: u32, amount: rust_decimal::Decimal, reference: &str) -> HistoryEntry {
        HistoryEntry {
            kind,
            time: Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap(),
            amount,
            reference: reference.to_string(),
        }
    }

    fn invoice(id: i64, minute: u32, amount: rust_decimal::Decimal, reference: &str) -> Invoice {
        Invoice {
            id,
            number_id: Uuid::nil(),
            time: Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap(),
            added_load: amount,
            balance: amount,
            reference_number: reference.to_string(),
        }
    }

    fn payment(id: i64, minute: u32, amount: rust_decimal::Decimal) -> Payment {
        Payment {
            id,
            number_id: Uuid::nil(),
            time: Utc.with_ymd_and_hms(2024, 6, 1, 12, minute, 0).unwrap(),
            paid_amount: amount,
        }
    }

    #[tokio::test]
    async fn test_merge_is_invoices_then_payments() {
        let service = HistoryService::new(Arc::new(MockLedgerRepository {
            invoices: vec![invoice(1, 5, dec!(100.00), "A"), invoice(2, 1, dec!(50.00), "B")],
            payments: vec![payment(1, 3, dec!(30.00))],
        }));

        let history = service.merge_history(Uuid::nil()).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].kind, EntryKind::Invoice);
        assert_eq!(history[1].kind, EntryKind::Invoice);
        assert_eq!(history[2].kind, EntryKind::Payment);
        assert_eq!(history[2].reference, "");
    }

    #[test]
    fn test_sort_token_parsing_with_fallback() {
        assert_eq!(SortKey::parse("amount_asc"), SortKey::AmountAsc);
        assert_eq!(SortKey::parse("type_desc"), SortKey::TypeDesc);
        assert_eq!(SortKey::parse("bogus"), SortKey::TimeDesc);
        assert_eq!(SortKey::parse(""), SortKey::TimeDesc);
    }

    #[test]
    fn test_filter_matches_reference_or_time() {
        let history = vec![
            entry(EntryKind::Invoice, 0, dec!(10.00), "REF-alpha"),
            entry(EntryKind::Invoice, 1, dec!(20.00), "REF-beta"),
            entry(EntryKind::Payment, 2, dec!(5.00), ""),
        ];

        // Case-insensitive reference match
        let page = query(history.clone(), "ALPHA", SortKey::TimeAsc, 1, 10);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].reference, "REF-alpha");

        // Time string match catches everything from that day
        let page = query(history.clone(), "2024-06-01", SortKey::TimeAsc, 1, 10);
        assert_eq!(page.items.len(), 3);

        // Empty search keeps everything
        let page = query(history, "", SortKey::TimeAsc, 1, 10);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn test_sort_directions() {
        let history = vec![
            entry(EntryKind::Invoice, 1, dec!(20.00), "A"),
            entry(EntryKind::Payment, 3, dec!(5.00), ""),
            entry(EntryKind::Invoice, 2, dec!(10.00), "B"),
        ];

        let page = query(history.clone(), "", SortKey::TimeDesc, 1, 10);
        assert_eq!(page.items[0].reference, "");
        assert_eq!(page.items[2].reference, "A");

        let page = query(history.clone(), "", SortKey::AmountAsc, 1, 10);
        assert_eq!(page.items[0].amount, dec!(5.00));
        assert_eq!(page.items[2].amount, dec!(20.00));

        let page = query(history, "", SortKey::TypeAsc, 1, 10);
        assert_eq!(page.items[0].kind, EntryKind::Invoice);
        assert_eq!(page.items[2].kind, EntryKind::Payment);
    }

    #[test]
    fn test_sort_stability_on_equal_amounts() {
        let history = vec![
            entry(EntryKind::Invoice, 1, dec!(10.00), "first"),
            entry(EntryKind::Invoice, 2, dec!(10.00), "second"),
            entry(EntryKind::Invoice, 3, dec!(10.00), "third"),
        ];

        let page = query(history, "", SortKey::AmountDesc, 1, 10);
        let refs: Vec<&str> = page.items.iter().map(|e| e.reference.as_str()).collect();
        assert_eq!(refs, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_merge_order_breaks_time_ties() {
        // Same timestamp: the invoices-then-payments base order survives
        // the stable default sort
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let history = vec![
            HistoryEntry {
                kind: EntryKind::Invoice,
                time: t,
                amount: dec!(10.00),
                reference: "INV".to_string(),
            },
            HistoryEntry {
                kind: EntryKind::Payment,
                time: t,
                amount: dec!(10.00),
                reference: String::new(),
            },
        ];

        let page = query(history, "", SortKey::TimeDesc, 1, 10);
        assert_eq!(page.items[0].kind, EntryKind::Invoice);
        assert_eq!(page.items[1].kind, EntryKind::Payment);
    }

    #[test]
    fn test_pagination_of_fifteen_entries() {
        let history: Vec<HistoryEntry> = (0..15)
            .map(|i| {
                let mut e = entry(EntryKind::Invoice, 0, dec!(1.00), &format!("R{}", i));
                e.time = e.time + Duration::minutes(i);
                e
            })
            .collect();

        let page1 = query(history.clone(), "", SortKey::TimeAsc, 1, 10);
        assert_eq!(page1.items.len(), 10);
        assert_eq!(page1.total_pages, 2);
        assert!(!page1.has_previous);
        assert!(page1.has_next);

        let page2 = query(history.clone(), "", SortKey::TimeAsc, 2, 10);
        assert_eq!(page2.items.len(), 5);
        assert!(page2.has_previous);
        assert!(!page2.has_next);

        // Beyond the end clamps to the last page
        let clamped = query(history.clone(), "", SortKey::TimeAsc, 99, 10);
        assert_eq!(clamped.page_number, 2);
        assert_eq!(clamped.items.len(), 5);

        // Below 1 clamps to the first page
        let clamped = query(history, "", SortKey::TimeAsc, 0, 10);
        assert_eq!(clamped.page_number, 1);
        assert_eq!(clamped.items.len(), 10);
    }

    #[test]
    fn test_empty_history_has_one_empty_page() {
        let page = query(vec![], "", SortKey::TimeDesc, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_end_to_end_page() {
        let service = HistoryService::new(Arc::new(MockLedgerRepository {
            invoices: (0..12)
                .map(|i| invoice(i, i as u32, dec!(100.00), &format!("REF-{}", i)))
                .collect(),
            payments: (0..3).map(|i| payment(i, 30 + i as u32, dec!(50.00))).collect(),
        }));

        let page = service
            .page(Uuid::nil(), "", SortKey::TimeDesc, 1)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 2);
        // Latest rows are the payments
        assert_eq!(page.items[0].kind, EntryKind::Payment);
    }
}
