//! Request validation.
//!
//! Turns inbound requests into validated commands. Everything here runs
//! before the engine touches storage, so a rejected request never mutates
//! anything.

use std::str::FromStr;

use rust_decimal::Decimal;

use paylane_shared::types::{AccountId, CurrencyCode};

use super::error::PaymentError;
use super::types::{
    Channel, ExternalPaymentRequest, InternalTransferRequest, RecipientDetails, TopUpRequest,
};

/// Validated internal transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalTransfer {
    /// Account to debit.
    pub from_account: AccountId,
    /// Account to credit.
    pub to_account: AccountId,
    /// Positive amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: CurrencyCode,
}

/// Validated external send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTransfer {
    /// Account to debit.
    pub from_account: AccountId,
    /// Positive amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: CurrencyCode,
    /// Supported external channel.
    pub channel: Channel,
    /// Who receives the funds.
    pub recipient: RecipientDetails,
}

/// Validated top-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUp {
    /// Account to credit.
    pub account: AccountId,
    /// Positive amount.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: CurrencyCode,
}

/// Rejects zero and negative amounts.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, PaymentError> {
    if amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount(amount));
    }
    Ok(amount)
}

/// Parses an opaque account identifier.
///
/// A string that is not a valid identifier can never resolve to an account,
/// so it is reported as `AccountNotFound`.
pub fn parse_account_id(raw: &str) -> Result<AccountId, PaymentError> {
    AccountId::from_str(raw.trim()).map_err(|_| PaymentError::AccountNotFound(raw.to_string()))
}

impl TryFrom<&InternalTransferRequest> for InternalTransfer {
    type Error = PaymentError;

    fn try_from(request: &InternalTransferRequest) -> Result<Self, Self::Error> {
        let amount = validate_amount(request.amount)?;
        let currency = CurrencyCode::parse(&request.currency)?;
        let from_account = parse_account_id(&request.from_account)?;
        let to_account = parse_account_id(&request.to_account)?;

        if from_account == to_account {
            return Err(PaymentError::SameAccount(from_account));
        }

        Ok(Self {
            from_account,
            to_account,
            amount,
            currency,
        })
    }
}

impl TryFrom<&ExternalPaymentRequest> for ExternalTransfer {
    type Error = PaymentError;

    fn try_from(request: &ExternalPaymentRequest) -> Result<Self, Self::Error> {
        let amount = validate_amount(request.amount)?;
        let channel = Channel::from_str(&request.transaction_type)?;
        let currency = CurrencyCode::parse(&request.currency)?;
        let from_account = parse_account_id(&request.from_account)?;

        Ok(Self {
            from_account,
            amount,
            currency,
            channel,
            recipient: request.recipient.clone(),
        })
    }
}

impl TryFrom<&TopUpRequest> for TopUp {
    type Error = PaymentError;

    fn try_from(request: &TopUpRequest) -> Result<Self, Self::Error> {
        let amount = validate_amount(request.amount)?;
        let currency = CurrencyCode::parse(&request.currency)?;
        let account = parse_account_id(&request.account)?;

        Ok(Self {
            account,
            amount,
            currency,
        })
    }
}
