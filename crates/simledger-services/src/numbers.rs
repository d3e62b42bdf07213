//! Number intake, search, and edit flows
//!
//! Creation resolves the operator before anything is persisted; a number
//! whose prefix is unknown is rejected with nothing written. Once assigned,
//! the operator never changes - edits update status, handler, and collection
//! day only.

use crate::balance::BalanceService;
use crate::operators::OperatorResolver;
use crate::phone;
use rust_decimal::Decimal;
use simledger_core::{
    models::{CollectionDay, Number, SimStatus},
    traits::{LedgerRepository, NumberRepository, PrefixRepository},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Input for number intake
#[derive(Debug, Clone)]
pub struct NewNumber {
    pub value: String,
    pub sim_status: SimStatus,
    pub client_id: Uuid,
    pub handler_id: i32,
    pub collection_day: CollectionDay,
}

/// Editable fields of an existing number
///
/// The operator assigned at intake is deliberately absent.
#[derive(Debug, Clone)]
pub struct NumberEdit {
    pub sim_status: SimStatus,
    pub handler_id: i32,
    pub collection_day: CollectionDay,
}

/// Number lifecycle operations
pub struct NumberService<N: NumberRepository, P: PrefixRepository, L: LedgerRepository> {
    numbers: Arc<N>,
    resolver: OperatorResolver<P>,
    balance: BalanceService<L>,
}

impl<N: NumberRepository, P: PrefixRepository, L: LedgerRepository> NumberService<N, P, L> {
    /// Create a new number service
    pub fn new(numbers: Arc<N>, prefix_repo: Arc<P>, ledger: Arc<L>) -> Self {
        Self {
            numbers,
            resolver: OperatorResolver::new(prefix_repo),
            balance: BalanceService::new(ledger),
        }
    }

    /// Intake a new number
    ///
    /// The operator is resolved first; `OperatorNotFound` aborts the flow
    /// with nothing persisted. A duplicate stored value is rejected with
    /// `AlreadyExists`.
    #[instrument(skip(self), fields(value = %new.value))]
    pub async fn create(&self, new: NewNumber) -> AppResult<Number> {
        let value = new.value.trim().to_string();
        if value.is_empty() {
            return Err(AppError::MissingField("value".to_string()));
        }

        let operator = self.resolver.resolve_operator(&value).await?;

        if self.numbers.find_by_value(&value).await?.is_some() {
            return Err(AppError::AlreadyExists(format!("Number {}", value)));
        }

        let number = Number {
            id: Uuid::new_v4(),
            value,
            sim_status: new.sim_status,
            operator_id: operator.id,
            client_id: new.client_id,
            handler_id: new.handler_id,
            collection_day: new.collection_day,
        };

        let created = self.numbers.create(&number).await?;
        info!(number_id = %created.id, operator = %operator.name, "Number created");

        Ok(created)
    }

    /// A number with its derived balance
    #[instrument(skip(self))]
    pub async fn detail(&self, number_id: Uuid) -> AppResult<(Number, Decimal)> {
        let number = self
            .numbers
            .find_by_id(number_id)
            .await?
            .ok_or(AppError::NumberNotFound)?;
        let balance = self.balance.current_balance(number_id).await?;

        Ok((number, balance))
    }

    /// A client's numbers, optionally narrowed by value fragment and operator
    ///
    /// The fragment goes through search normalization before matching, so
    /// `+63` and `0`-prefixed queries find locally stored values.
    #[instrument(skip(self))]
    pub async fn search_for_client(
        &self,
        client_id: Uuid,
        query: Option<&str>,
        operator_id: Option<i32>,
    ) -> AppResult<Vec<Number>> {
        let normalized = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(phone::normalize_search);

        self.numbers
            .list_for_client(client_id, normalized.as_deref(), operator_id)
            .await
    }

    /// Search across all of a user's numbers
    ///
    /// An empty query lists everything; otherwise the query is normalized
    /// and matched as a substring of stored values.
    #[instrument(skip(self))]
    pub async fn search_for_user(&self, user_id: i32, query: &str) -> AppResult<Vec<Number>> {
        let query = query.trim();
        if query.is_empty() {
            return self.numbers.list_for_user(user_id).await;
        }

        let normalized = phone::normalize_search(query);
        debug!(%normalized, "Searching numbers");
        self.numbers.search_for_user(user_id, &normalized).await
    }

    /// Apply an edit to an existing number
    ///
    /// Value and operator are carried over unchanged from the stored row.
    #[instrument(skip(self))]
    pub async fn edit(&self, number_id: Uuid, edit: NumberEdit) -> AppResult<Number> {
        let mut number = self
            .numbers
            .find_by_id(number_id)
            .await?
            .ok_or(AppError::NumberNotFound)?;

        number.sim_status = edit.sim_status;
        number.handler_id = edit.handler_id;
        number.collection_day = edit.collection_day;

        self.numbers.update(&number).await
    }

    /// Number count and summed balance across one client's inventory
    #[instrument(skip(self))]
    pub async fn client_totals(&self, client_id: Uuid) -> AppResult<(usize, Decimal)> {
        let numbers = self.numbers.list_for_client(client_id, None, None).await?;

        let mut total = Decimal::ZERO;
        for number in &numbers {
            total += self.balance.current_balance(number.id).await?;
        }

        Ok((numbers.len(), total))
    }

    /// Delete a number and (via storage cascade) its ledger rows
    #[instrument(skip(self))]
    pub async fn delete(&self, number_id: Uuid) -> AppResult<()> {
        if !self.numbers.delete(number_id).await? {
            return Err(AppError::NumberNotFound);
        }
        info!(%number_id, "Number deleted");
        Ok(())
    }
}
