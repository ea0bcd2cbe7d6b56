//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Methods that mutate balances take the caller's `DatabaseTransaction` so they
//! can only run inside a unit of work.

pub mod account;
pub mod ledger;
pub mod payment;

pub use account::{AccountRepository, CreateAccountInput};
pub use ledger::LedgerRepository;
pub use payment::{CreatePaymentInput, CreateRecipientInput, PaymentRepository};

use sea_orm::DbErr;

/// Wraps a row that could not be mapped to a domain type.
pub(crate) fn corrupt_row(table: &str, detail: impl std::fmt::Display) -> DbErr {
    DbErr::Custom(format!("corrupt {table} row: {detail}"))
}
