//! Ledger models
//!
//! Invoices (debits) and payments (credits) attached to a number, plus the
//! type-tagged `HistoryEntry` projection used by the unified history table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Invoice entity - a debit event against a number
///
/// `balance` is the amount added to what is owed by this row, not a running
/// total. `added_load` records the airtime load that was sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: i64,

    /// Owning number
    pub number_id: Uuid,

    /// When the load was issued
    pub time: DateTime<Utc>,

    /// Load amount credited to the SIM
    pub added_load: Decimal,

    /// Amount owed by this invoice (debit delta)
    pub balance: Decimal,

    /// Telco transaction reference
    pub reference_number: String,
}

/// Payment entity - a credit event against a number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: i64,

    /// Owning number
    pub number_id: Uuid,

    /// When the payment was received
    pub time: DateTime<Utc>,

    /// Amount paid
    pub paid_amount: Decimal,
}

/// Kind tag for a history entry
///
/// Ordering is the display ordering used by the `type_asc`/`type_desc` sort
/// keys: `Invoice` sorts before `Payment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryKind {
    Invoice,
    Payment,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Invoice => write!(f, "Invoice"),
            EntryKind::Payment => write!(f, "Payment"),
        }
    }
}

/// One row of the unified invoice/payment history table
///
/// Derived projection, never persisted. Invoices contribute their `balance`
/// as the amount and carry their reference; payments contribute their
/// `paid_amount` and an empty reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Invoice or Payment
    pub kind: EntryKind,

    /// Event timestamp
    pub time: DateTime<Utc>,

    /// Debit or credit amount
    pub amount: Decimal,

    /// Reference number; always empty for payments
    pub reference: String,
}

impl HistoryEntry {
    /// Project an invoice row into the common history shape
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            kind: EntryKind::Invoice,
            time: invoice.time,
            amount: invoice.balance,
            reference: invoice.reference_number.clone(),
        }
    }

    /// Project a payment row into the common history shape
    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            kind: EntryKind::Payment,
            time: payment.time,
            amount: payment.paid_amount,
            reference: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_invoice() -> Invoice {
        Invoice {
            id: 1,
            number_id: Uuid::nil(),
            time: Utc::now(),
            added_load: dec!(500.00),
            balance: dec!(450.00),
            reference_number: "REF-1001".to_string(),
        }
    }

    fn sample_payment() -> Payment {
        Payment {
            id: 1,
            number_id: Uuid::nil(),
            time: Utc::now(),
            paid_amount: dec!(200.00),
        }
    }

    #[test]
    fn test_invoice_projection() {
        let invoice = sample_invoice();
        let entry = HistoryEntry::from_invoice(&invoice);

        assert_eq!(entry.kind, EntryKind::Invoice);
        assert_eq!(entry.time, invoice.time);
        assert_eq!(entry.amount, dec!(450.00)); // balance delta, not added_load
        assert_eq!(entry.reference, "REF-1001");
    }

    #[test]
    fn test_payment_projection_has_empty_reference() {
        let payment = sample_payment();
        let entry = HistoryEntry::from_payment(&payment);

        assert_eq!(entry.kind, EntryKind::Payment);
        assert_eq!(entry.amount, dec!(200.00));
        assert_eq!(entry.reference, "");
    }

    #[test]
    fn test_entry_kind_ordering() {
        assert!(EntryKind::Invoice < EntryKind::Payment);
        assert_eq!(EntryKind::Invoice.to_string(), "Invoice");
        assert_eq!(EntryKind::Payment.to_string(), "Payment");
    }
}
