//! Property-based tests for request validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use paylane_shared::types::AccountId;

use super::error::PaymentError;
use super::types::{InternalTransferRequest, TopUpRequest};
use super::validation::{InternalTransfer, TopUp, validate_amount};

fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (i64::MIN / 2..=0i64, 0u32..=8).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..i64::MAX / 2, 0u32..=8).prop_map(|(units, scale)| Decimal::new(units, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* non-positive amount, validation fails with `InvalidAmount`.
    #[test]
    fn prop_non_positive_amounts_rejected(amount in non_positive_amount()) {
        prop_assert_eq!(validate_amount(amount), Err(PaymentError::InvalidAmount(amount)));
    }

    /// *For any* positive amount, validation returns it unchanged.
    #[test]
    fn prop_positive_amounts_accepted(amount in positive_amount()) {
        prop_assert_eq!(validate_amount(amount), Ok(amount));
    }

    /// Amount is checked before identifiers, whatever the identifiers are.
    #[test]
    fn prop_amount_checked_before_accounts(
        amount in non_positive_amount(),
        from in "[a-z0-9-]{0,40}",
        to in "[a-z0-9-]{0,40}",
    ) {
        let request = InternalTransferRequest {
            from_account: from,
            to_account: to,
            amount,
            currency: "USD".to_string(),
        };
        prop_assert_eq!(
            InternalTransfer::try_from(&request),
            Err(PaymentError::InvalidAmount(amount))
        );
    }

    /// A top-up with a valid account keeps the requested amount exactly.
    #[test]
    fn prop_top_up_preserves_amount(amount in positive_amount()) {
        let account = AccountId::new();
        let request = TopUpRequest {
            account: account.to_string(),
            amount,
            currency: "KES".to_string(),
        };
        let command = TopUp::try_from(&request).unwrap();
        prop_assert_eq!(command.account, account);
        prop_assert_eq!(command.amount, amount);
    }
}
