//! Business logic services for SimLedger
//!
//! This crate contains the engine behind the back-office operations:
//! operator identification, balance derivation, unified ledger history,
//! collections listings, and statement assembly.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its dependencies as `Arc`-wrapped repository traits
//! - All read operations are pure over the fetched ledger snapshot
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `OperatorResolver` - maps a raw number to its carrier by prefix
//! - `BalanceService` - derives a number's outstanding balance
//! - `CollectionsService` - numbers due on a collection day
//! - `HistoryService` - merged invoice/payment history with search/sort/paging
//! - `StatementService` - date-ranged statement data for PDF export
//! - `NumberService` - number intake, search, and edit flows

pub mod balance;
pub mod history;
pub mod numbers;
pub mod operators;
pub mod phone;
pub mod statement;

pub use balance::{BalanceService, CollectionDue, CollectionsService};
pub use history::{HistoryPage, HistoryService, SortKey};
pub use numbers::{NewNumber, NumberEdit, NumberService};
pub use operators::OperatorResolver;
pub use statement::{Statement, StatementService};

/// Business logic constants
pub mod constants {
    /// Entries per page in the unified history table
    pub const HISTORY_PAGE_SIZE: usize = 10;

    /// Calendar date format accepted by statement range queries
    pub const STATEMENT_DATE_FORMAT: &str = "%Y-%m-%d";
}
