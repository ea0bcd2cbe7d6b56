//! Ledger postings.
//!
//! Every committed payment writes one ledger entry per account it touched,
//! signed by direction. The postings of a payment always sum to the net
//! balance change it causes inside the system.

use rust_decimal::Decimal;

use paylane_shared::types::AccountId;

use super::types::PaymentKind;

/// One planned balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Account whose balance changes.
    pub account_id: AccountId,
    /// Signed amount: negative for a debit, positive for a credit.
    pub amount: Decimal,
}

impl Posting {
    /// A debit of `amount` from `account_id`.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount: -amount,
        }
    }

    /// A credit of `amount` to `account_id`.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self { account_id, amount }
    }

    /// Returns true if this posting lowers the balance.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Plans the postings for a payment of `amount`.
///
/// - Internal: debit `from`, credit `to` (sums to zero).
/// - External: debit `from` only; the money leaves the system.
/// - Top-up: credit `from` only; the money enters the system.
#[must_use]
pub fn plan_postings(
    kind: PaymentKind,
    from: AccountId,
    to: AccountId,
    amount: Decimal,
) -> Vec<Posting> {
    match kind {
        PaymentKind::Internal => vec![Posting::debit(from, amount), Posting::credit(to, amount)],
        PaymentKind::External => vec![Posting::debit(from, amount)],
        PaymentKind::TopUp => vec![Posting::credit(from, amount)],
    }
}

/// Sums signed posting amounts.
#[must_use]
pub fn net_change(postings: &[Posting]) -> Decimal {
    postings.iter().map(|p| p.amount).sum()
}
