//! Balance read model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use paylane_shared::types::{AccountId, CurrencyCode};

use super::error::PaymentError;

/// Current balance of an account.
///
/// A snapshot only: a concurrent debit can invalidate it right after it was
/// read, so the engine never relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Balance at read time.
    pub balance: Decimal,
    /// Currency code.
    pub currency: CurrencyCode,
}

impl AccountBalance {
    /// Returns true if the snapshot covers `amount`.
    #[must_use]
    pub fn covers(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Friendly pre-check used before invoking the engine.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientBalance` if the snapshot does not cover `amount`.
    pub fn precheck_debit(&self, amount: Decimal) -> Result<(), PaymentError> {
        if self.covers(amount) {
            Ok(())
        } else {
            Err(PaymentError::InsufficientBalance(self.account_id))
        }
    }
}
