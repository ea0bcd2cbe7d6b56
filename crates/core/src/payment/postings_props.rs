//! Property-based tests for ledger postings.
//!
//! - Conservation: internal postings always sum to zero
//! - Net change: external and top-up postings move exactly the amount

use proptest::prelude::*;
use rust_decimal::Decimal;

use paylane_shared::types::AccountId;

use super::postings::{net_change, plan_postings};
use super::types::PaymentKind;

/// Strategy to generate positive decimal amounts (0.01 to 10,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate amounts with up to 8 fractional digits.
fn fine_grained_amount() -> impl Strategy<Value = Decimal> {
    (1i64..i64::MAX / 2, 0u32..=8).prop_map(|(units, scale)| Decimal::new(units, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* internal transfer, the postings sum to zero and the source
    /// loses exactly what the destination gains.
    #[test]
    fn prop_internal_postings_conserve_funds(amount in positive_amount()) {
        let from = AccountId::new();
        let to = AccountId::new();
        let postings = plan_postings(PaymentKind::Internal, from, to, amount);

        prop_assert_eq!(net_change(&postings), Decimal::ZERO);
        prop_assert_eq!(postings[0].account_id, from);
        prop_assert_eq!(postings[0].amount, -amount);
        prop_assert_eq!(postings[1].account_id, to);
        prop_assert_eq!(postings[1].amount, amount);
    }

    /// Conservation holds exactly for any decimal scale.
    #[test]
    fn prop_conservation_is_exact_at_any_scale(amount in fine_grained_amount()) {
        let postings = plan_postings(PaymentKind::Internal, AccountId::new(), AccountId::new(), amount);
        prop_assert!(net_change(&postings).is_zero());
    }

    /// External sends remove exactly the amount from the system.
    #[test]
    fn prop_external_net_change(amount in positive_amount()) {
        let from = AccountId::new();
        let postings = plan_postings(PaymentKind::External, from, from, amount);
        prop_assert_eq!(postings.len(), 1);
        prop_assert_eq!(net_change(&postings), -amount);
    }

    /// Top-ups add exactly the amount to the system.
    #[test]
    fn prop_top_up_net_change(amount in positive_amount()) {
        let account = AccountId::new();
        let postings = plan_postings(PaymentKind::TopUp, account, account, amount);
        prop_assert_eq!(postings.len(), 1);
        prop_assert_eq!(net_change(&postings), amount);
    }

    /// A sequence of internal transfers between two accounts never changes
    /// their combined balance.
    #[test]
    fn prop_repeated_transfers_conserve_total(
        amounts in proptest::collection::vec(positive_amount(), 1..50),
    ) {
        let a = AccountId::new();
        let b = AccountId::new();
        let mut balance_a = Decimal::new(1_000_000_000, 2);
        let mut balance_b = Decimal::ZERO;
        let total = balance_a + balance_b;

        for (i, amount) in amounts.into_iter().enumerate() {
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            for posting in plan_postings(PaymentKind::Internal, from, to, amount) {
                if posting.account_id == a {
                    balance_a += posting.amount;
                } else {
                    balance_b += posting.amount;
                }
            }
        }

        prop_assert_eq!(balance_a + balance_b, total);
    }
}
