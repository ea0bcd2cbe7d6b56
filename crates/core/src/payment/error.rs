//! Payment error taxonomy.
//!
//! Every engine operation fails with exactly one of these kinds. Any failure
//! raised after the unit of work has begun implies that all of its effects
//! were discarded.

use rust_decimal::Decimal;
use thiserror::Error;

use paylane_shared::types::{AccountId, CurrencyCode, CurrencyError, PaymentId};

use super::settlement::SettlementError;

/// Errors that can occur while moving funds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    // ========== Request Errors (no storage access) ==========
    /// Amount is zero or negative.
    #[error("Invalid amount {0}: amount must be greater than zero")]
    InvalidAmount(Decimal),

    /// Currency code is malformed.
    #[error("Invalid currency code: '{0}'")]
    InvalidCurrency(String),

    /// Source and destination of an internal transfer are the same account.
    #[error("Source and destination account are the same: {0}")]
    SameAccount(AccountId),

    /// External channel outside the supported set.
    #[error("Unsupported channel '{0}': supported channels are BANK_TRANSFER and MOBILE_MONEY")]
    UnsupportedChannel(String),

    // ========== Account Errors ==========
    /// Account identifier does not resolve.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Request currency differs from the account's currency.
    #[error("Currency mismatch for account {account}: account holds {expected}, request uses {actual}")]
    CurrencyMismatch {
        /// The account whose currency differs.
        account: AccountId,
        /// Currency the account was created with.
        expected: CurrencyCode,
        /// Currency named by the request.
        actual: CurrencyCode,
    },

    /// Conditional debit affected zero rows.
    #[error("Insufficient balance in account {0}")]
    InsufficientBalance(AccountId),

    // ========== Execution Errors ==========
    /// The settlement channel rejected an external send.
    #[error("Settlement failed: {0}")]
    SettlementFailed(String),

    /// The send reached the settlement channel, then the unit of work was
    /// discarded before commit. The provider may have paid out, so the request
    /// must be reconciled rather than retried.
    #[error("Settlement of payment {0} is unconfirmed")]
    SettlementUnconfirmed(PaymentId),

    /// The unit of work exceeded its deadline and was discarded.
    #[error("Operation exceeded its deadline of {0} ms")]
    Cancelled(u64),

    /// Any read/write/commit failure not otherwise classified.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::SameAccount(_) => "SAME_ACCOUNT",
            Self::UnsupportedChannel(_) => "UNSUPPORTED_CHANNEL",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::InsufficientBalance(_) => "INSUFFICIENT_BALANCE",
            Self::SettlementFailed(_) => "SETTLEMENT_FAILED",
            Self::SettlementUnconfirmed(_) => "SETTLEMENT_UNCONFIRMED",
            Self::Cancelled(_) => "CANCELLED",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed requests
            Self::InvalidAmount(_)
            | Self::InvalidCurrency(_)
            | Self::SameAccount(_)
            | Self::UnsupportedChannel(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) => 404,

            // 422 Unprocessable - business rule violations
            Self::CurrencyMismatch { .. } | Self::InsufficientBalance(_) => 422,

            Self::SettlementFailed(_) | Self::SettlementUnconfirmed(_) => 502,
            Self::Cancelled(_) => 504,
            Self::StorageFailure(_) => 500,
        }
    }

    /// Returns true if a caller may retry the same request.
    ///
    /// The engine itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageFailure(_) | Self::Cancelled(_))
    }

    /// Returns a message that is safe to show to an end user.
    ///
    /// Storage and settlement details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidAmount(_) => "Invalid amount".to_string(),
            Self::InvalidCurrency(code) => format!("Invalid currency code '{code}'"),
            Self::SameAccount(_) => {
                "Source and destination account must be different".to_string()
            }
            Self::UnsupportedChannel(_) => {
                "Invalid transaction type support BANK_TRANSFER or MOBILE_MONEY".to_string()
            }
            Self::AccountNotFound(_) => "Account not found".to_string(),
            Self::CurrencyMismatch { expected, .. } => {
                format!("This account only accepts {expected}")
            }
            Self::InsufficientBalance(_) => "Insufficient balance".to_string(),
            Self::SettlementFailed(_) => {
                "The payment provider could not settle this payment".to_string()
            }
            Self::SettlementUnconfirmed(_) => {
                "Payment status is being confirmed, please do not retry".to_string()
            }
            Self::Cancelled(_) | Self::StorageFailure(_) => {
                "Failed to process payment, please try again later".to_string()
            }
        }
    }
}

impl From<CurrencyError> for PaymentError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::Invalid(code) => Self::InvalidCurrency(code),
        }
    }
}

impl From<SettlementError> for PaymentError {
    fn from(err: SettlementError) -> Self {
        Self::SettlementFailed(err.to_string())
    }
}
