//! Funds movement domain.
//!
//! This module implements the engine-independent payment functionality:
//! - Inbound request shapes and validated commands
//! - The payment error taxonomy
//! - Ledger postings for every payment kind
//! - The pluggable settlement channel for external sends
//! - Caller-facing outcomes (response builder)
//! - Balance pre-checks for the read path

pub mod balance;
pub mod error;
pub mod outcome;
pub mod postings;
pub mod settlement;
pub mod types;
pub mod validation;

#[cfg(test)]
mod postings_props;
#[cfg(test)]
mod validation_props;

pub use balance::AccountBalance;
pub use error::PaymentError;
pub use outcome::{PaymentFailure, PaymentOutcome, PaymentReceipt};
pub use postings::{Posting, net_change, plan_postings};
pub use settlement::{
    InstantSettlement, SettlementChannel, SettlementError, SettlementInstruction,
    SettlementReceipt,
};
pub use types::{
    Account, Channel, ExternalPaymentRequest, ExternalPaymentResult, InternalTransferRequest,
    LedgerEntry, Payment, PaymentKind, PaymentStatus, RecipientDetails, TopUpRequest, TopUpResult,
};
pub use validation::{ExternalTransfer, InternalTransfer, TopUp, parse_account_id, validate_amount};
