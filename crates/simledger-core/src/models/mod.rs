//! Domain models for SimLedger
//!
//! This module contains all the core domain models used throughout the application.

pub mod client;
pub mod ledger;
pub mod location;
pub mod number;
pub mod operator;
pub mod user;

pub use client::{Client, ClientStatus, Handler};
pub use ledger::{EntryKind, HistoryEntry, Invoice, Payment};
pub use location::{Address, Barangay, Municipality, Province, Region};
pub use number::{CollectionDay, Number, SimStatus};
pub use operator::{Operator, PrefixEntry};
pub use user::{User, UserInfo, UserRole};
