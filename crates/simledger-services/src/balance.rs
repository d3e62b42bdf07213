//! Balance derivation services
//!
//! A number's outstanding balance is derived on every call from its ledger:
//! the sum of invoice debits minus the sum of payment credits. There is no
//! caching and no incremental maintenance; empty ledgers are a valid zero
//! state, not an error.

use rust_decimal::Decimal;
use simledger_core::{
    models::{CollectionDay, Number},
    traits::{LedgerRepository, NumberRepository},
    AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Pure balance reads over an injected ledger store
pub struct BalanceService<L: LedgerRepository> {
    ledger: Arc<L>,
}

impl<L: LedgerRepository> BalanceService<L> {
    /// Create a new balance service
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Current outstanding balance of a number
    ///
    /// `Σ invoice.balance − Σ payment.paid_amount`; both sums are zero when
    /// the respective side is empty. Exact decimal arithmetic throughout.
    #[instrument(skip(self))]
    pub async fn current_balance(&self, number_id: Uuid) -> AppResult<Decimal> {
        let invoices = self.ledger.invoices_for(number_id).await?;
        let payments = self.ledger.payments_for(number_id).await?;

        let invoiced: Decimal = invoices.iter().map(|i| i.balance).sum();
        let paid: Decimal = payments.iter().map(|p| p.paid_amount).sum();

        let balance = invoiced - paid;
        debug!(%number_id, %invoiced, %paid, %balance, "Computed current balance");

        Ok(balance)
    }
}

/// A number due for collection with its derived balance
#[derive(Debug, Clone)]
pub struct CollectionDue {
    pub number: Number,
    pub balance: Decimal,
}

/// Collection-day listings
///
/// Fetches the user's active numbers for a weekday and pairs each with its
/// derived balance. Only positive-balance numbers are kept unless `show_all`
/// is requested; the filter runs here over the fetched snapshot rather than
/// inside the store query.
pub struct CollectionsService<N: NumberRepository, L: LedgerRepository> {
    numbers: Arc<N>,
    balance: BalanceService<L>,
}

impl<N: NumberRepository, L: LedgerRepository> CollectionsService<N, L> {
    /// Create a new collections service
    pub fn new(numbers: Arc<N>, ledger: Arc<L>) -> Self {
        Self {
            numbers,
            balance: BalanceService::new(ledger),
        }
    }

    /// Numbers due on a collection day for one user
    #[instrument(skip(self))]
    pub async fn due(
        &self,
        user_id: i32,
        day: CollectionDay,
        show_all: bool,
    ) -> AppResult<Vec<CollectionDue>> {
        let numbers = self.numbers.list_by_collection_day(user_id, day).await?;
        debug!(count = numbers.len(), %day, "Fetched numbers for collection day");

        let mut due = Vec::with_capacity(numbers.len());
        for number in numbers {
            let balance = self.balance.current_balance(number.id).await?;
            if show_all || balance > Decimal::ZERO {
                due.push(CollectionDue { number, balance });
            }
        }

        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use simledger_core::models::{Invoice, Payment, SimStatus};
    use simledger_core::traits::Repository;
    use simledger_core::AppError;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockLedgerRepository {
        invoices: HashMap<Uuid, Vec<Invoice>>,
        payments: HashMap<Uuid, Vec<Payment>>,
    }

    impl MockLedgerRepository {
        fn with_rows(
            number_id: Uuid,
            invoice_amounts: &[Decimal],
            payment_amounts: &[Decimal],
        ) -> Self {
            let mut repo = Self::default();
            repo.invoices.insert(
                number_id,
                invoice_amounts
                    .iter()
                    .enumerate()
                    .map(|(i, amount)| Invoice {
                        id: i as i64,
                        number_id,
                        time: Utc::now(),
                        added_load: *amount,
                        balance: *amount,
                        reference_number: format!("REF-{}", i),
                    })
                    .collect(),
            );
            repo.payments.insert(
                number_id,
                payment_amounts
                    .iter()
                    .enumerate()
                    .map(|(i, amount)| Payment {
                        id: i as i64,
                        number_id,
                        time: Utc::now(),
                        paid_amount: *amount,
                    })
                    .collect(),
            );
            repo
        }
    }

    #[async_trait]
    impl LedgerRepository for MockLedgerRepository {
        async fn invoices_for(&self, number_id: Uuid) -> AppResult<Vec<Invoice>> {
            Ok(self.invoices.get(&number_id).cloned().unwrap_or_default())
        }

        async fn payments_for(&self, number_id: Uuid) -> AppResult<Vec<Payment>> {
            Ok(self.payments.get(&number_id).cloned().unwrap_or_default())
        }

        async fn add_invoice(&self, _invoice: &Invoice) -> AppResult<Invoice> {
            Err(AppError::Internal("not used".to_string()))
        }

        async fn add_payment(&self, _payment: &Payment) -> AppResult<Payment> {
            Err(AppError::Internal("not used".to_string()))
        }
    }

    struct MockNumberRepository {
        numbers: Vec<Number>,
    }

    #[async_trait]
    impl Repository<Number, Uuid> for MockNumberRepository {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Number>> {
            Ok(self.numbers.iter().find(|n| n.id == id).cloned())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Number>> {
            Ok(self.numbers.clone())
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.numbers.len() as i64)
        }

        async fn create(&self, entity: &Number) -> AppResult<Number> {
            Ok(entity.clone())
        }

        async fn update(&self, entity: &Number) -> AppResult<Number> {
            Ok(entity.clone())
        }

        async fn delete(&self, _id: Uuid) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl NumberRepository for MockNumberRepository {
        async fn find_by_value(&self, value: &str) -> AppResult<Option<Number>> {
            Ok(self.numbers.iter().find(|n| n.value == value).cloned())
        }

        async fn list_for_client(
            &self,
            client_id: Uuid,
            _value_fragment: Option<&str>,
            _operator_id: Option<i32>,
        ) -> AppResult<Vec<Number>> {
            Ok(self
                .numbers
                .iter()
                .filter(|n| n.client_id == client_id)
                .cloned()
                .collect())
        }

        async fn search_for_user(
            &self,
            _user_id: i32,
            value_fragment: &str,
        ) -> AppResult<Vec<Number>> {
            Ok(self
                .numbers
                .iter()
                .filter(|n| n.value.contains(value_fragment))
                .cloned()
                .collect())
        }

        async fn list_for_user(&self, _user_id: i32) -> AppResult<Vec<Number>> {
            Ok(self.numbers.clone())
        }

        async fn list_by_collection_day(
            &self,
            _user_id: i32,
            day: CollectionDay,
        ) -> AppResult<Vec<Number>> {
            Ok(self
                .numbers
                .iter()
                .filter(|n| n.collection_day == day)
                .cloned()
                .collect())
        }
    }

    fn number(id: Uuid, value: &str, day: CollectionDay) -> Number {
        Number {
            id,
            value: value.to_string(),
            sim_status: SimStatus::Active,
            operator_id: 1,
            client_id: Uuid::nil(),
            handler_id: 1,
            collection_day: day,
        }
    }

    #[tokio::test]
    async fn test_empty_ledger_is_zero() {
        let number_id = Uuid::new_v4();
        let service = BalanceService::new(Arc::new(MockLedgerRepository::default()));

        assert_eq!(service.current_balance(number_id).await.unwrap(), dec!(0));
    }

    #[tokio::test]
    async fn test_balance_is_invoices_minus_payments() {
        let number_id = Uuid::new_v4();
        let ledger = MockLedgerRepository::with_rows(
            number_id,
            &[dec!(450.00), dec!(120.50)],
            &[dec!(200.00), dec!(0.25)],
        );
        let service = BalanceService::new(Arc::new(ledger));

        assert_eq!(
            service.current_balance(number_id).await.unwrap(),
            dec!(370.25)
        );
    }

    #[tokio::test]
    async fn test_balance_can_go_negative() {
        let number_id = Uuid::new_v4();
        let ledger = MockLedgerRepository::with_rows(number_id, &[dec!(100.00)], &[dec!(150.00)]);
        let service = BalanceService::new(Arc::new(ledger));

        assert_eq!(
            service.current_balance(number_id).await.unwrap(),
            dec!(-50.00)
        );
    }

    #[tokio::test]
    async fn test_collections_keep_positive_balances_only() {
        let owing = Uuid::new_v4();
        let settled = Uuid::new_v4();

        let mut ledger =
            MockLedgerRepository::with_rows(owing, &[dec!(500.00)], &[dec!(100.00)]);
        ledger
            .invoices
            .insert(settled, vec![]);
        ledger.payments.insert(settled, vec![]);

        let numbers = MockNumberRepository {
            numbers: vec![
                number(owing, "9171234567", CollectionDay::Monday),
                number(settled, "9187654321", CollectionDay::Monday),
                number(Uuid::new_v4(), "9170000001", CollectionDay::Friday),
            ],
        };

        let service = CollectionsService::new(Arc::new(numbers), Arc::new(ledger));

        let due = service.due(1, CollectionDay::Monday, false).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].number.id, owing);
        assert_eq!(due[0].balance, dec!(400.00));
    }

    #[tokio::test]
    async fn test_collections_show_all_includes_settled() {
        let owing = Uuid::new_v4();
        let settled = Uuid::new_v4();

        let ledger = MockLedgerRepository::with_rows(owing, &[dec!(500.00)], &[]);

        let numbers = MockNumberRepository {
            numbers: vec![
                number(owing, "9171234567", CollectionDay::Monday),
                number(settled, "9187654321", CollectionDay::Monday),
            ],
        };

        let service = CollectionsService::new(Arc::new(numbers), Arc::new(ledger));

        let due = service.due(1, CollectionDay::Monday, true).await.unwrap();
        assert_eq!(due.len(), 2);
    }
}
