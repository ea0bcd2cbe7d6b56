//! Payment domain types.
//!
//! Inbound request shapes mirror the wire contract; records mirror what the
//! stores persist; result types are what the engine hands back to callers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use paylane_shared::types::{AccountId, CurrencyCode, LedgerEntryId, PaymentId, UserId};

use super::error::PaymentError;

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Created, not yet settled.
    Pending,
    /// Balance mutations and records committed.
    Completed,
    /// Recorded as failed.
    Failed,
}

impl PaymentStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns true if no further transition is allowed.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Account to account within the system.
    Internal,
    /// Funds leave the system through an external channel.
    External,
    /// Funds enter the system from an external top-up source.
    TopUp,
}

impl PaymentKind {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::TopUp => "top_up",
        }
    }

    /// Returns the description recorded on the payment.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "Internal Payment",
            Self::External => "External Payment",
            Self::TopUp => "Top up",
        }
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External channel a payment can leave the system through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Bank transfer.
    BankTransfer,
    /// Mobile money wallet.
    MobileMoney,
}

impl Channel {
    /// Returns the wire form of the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankTransfer => "BANK_TRANSFER",
            Self::MobileMoney => "MOBILE_MONEY",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BANK_TRANSFER" => Ok(Self::BankTransfer),
            "MOBILE_MONEY" => Ok(Self::MobileMoney),
            other => Err(PaymentError::UnsupportedChannel(other.to_string())),
        }
    }
}

/// Recipient of an external send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientDetails {
    /// Bank account or mobile money number.
    #[serde(rename = "recipientNumber")]
    pub number: String,
    /// Display name of the recipient.
    #[serde(rename = "recipientName")]
    pub name: String,
}

// ============================================================================
// Inbound requests
// ============================================================================

/// Request to move funds between two accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct InternalTransferRequest {
    /// Source account identifier (opaque string).
    pub from_account: String,
    /// Destination account identifier (opaque string).
    pub to_account: String,
    /// Amount to move.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
}

/// Request to send funds to an external recipient.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalPaymentRequest {
    /// Source account identifier (opaque string).
    pub from_account: String,
    /// Amount to send.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Channel name, `BANK_TRANSFER` or `MOBILE_MONEY`.
    pub transaction_type: String,
    /// Who receives the funds.
    pub recipient: RecipientDetails,
}

/// Request to credit an account from an external source.
#[derive(Debug, Clone, Deserialize)]
pub struct TopUpRequest {
    /// Account identifier (opaque string).
    pub account: String,
    /// Amount to credit.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
}

// ============================================================================
// Records
// ============================================================================

/// A balance-holding account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning user.
    pub user_id: UserId,
    /// Currency fixed at creation.
    pub currency: CurrencyCode,
    /// Current balance, never negative after commit.
    pub balance: Decimal,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The durable record of one funds movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Account debited (or credited, for top-ups).
    pub from_account: AccountId,
    /// Account credited; equals `from_account` for top-ups and external sends.
    pub to_account: AccountId,
    /// Currency of the amount.
    pub currency: CurrencyCode,
    /// Amount moved, always positive.
    pub amount: Decimal,
    /// Current status.
    pub status: PaymentStatus,
    /// Classification.
    pub kind: PaymentKind,
    /// Free-text description.
    pub description: String,
    /// When the payment was created.
    pub created_at: DateTime<Utc>,
    /// When the payment was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Audit-trail record of one balance change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier.
    pub id: LedgerEntryId,
    /// Account whose balance changed.
    pub account_id: AccountId,
    /// Payment that caused the change.
    pub payment_id: PaymentId,
    /// Signed amount: negative for a debit, positive for a credit.
    pub amount: Decimal,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Results
// ============================================================================

/// Result of an external payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalPaymentResult {
    /// Payment identifier.
    pub payment_id: PaymentId,
    /// Echo of the recipient.
    pub recipient: RecipientDetails,
    /// Settlement status.
    pub status: String,
    /// Status reported by the settlement channel.
    pub provider_status: String,
}

/// Result of a top-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUpResult {
    /// Payment identifier.
    pub payment_id: PaymentId,
    /// Status string.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_channel_from_str() {
        assert_eq!(Channel::from_str("BANK_TRANSFER").unwrap(), Channel::BankTransfer);
        assert_eq!(Channel::from_str("MOBILE_MONEY").unwrap(), Channel::MobileMoney);
        assert_eq!(
            Channel::from_str("INVALID_TYPE"),
            Err(PaymentError::UnsupportedChannel("INVALID_TYPE".into()))
        );
        assert!(Channel::from_str("bank_transfer").is_err());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(PaymentStatus::Pending.to_string(), "pending");
        assert_eq!(PaymentStatus::Completed.as_str(), "completed");
        assert!(PaymentStatus::Failed.is_final());
        assert!(!PaymentStatus::Pending.is_final());
    }

    #[test]
    fn test_kind_descriptions() {
        assert_eq!(PaymentKind::Internal.description(), "Internal Payment");
        assert_eq!(PaymentKind::External.description(), "External Payment");
        assert_eq!(PaymentKind::TopUp.description(), "Top up");
        assert_eq!(PaymentKind::TopUp.as_str(), "top_up");
    }

    #[test]
    fn test_external_request_wire_shape() {
        let json = r#"{
            "from_account": "0190a0d8-0000-7000-8000-000000000001",
            "amount": "200.00",
            "currency": "USD",
            "transaction_type": "MOBILE_MONEY",
            "recipient": {"recipientNumber": "0771234567", "recipientName": "Jane Smith"}
        }"#;
        let request: ExternalPaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, Decimal::new(20000, 2));
        assert_eq!(request.recipient.number, "0771234567");
        assert_eq!(request.recipient.name, "Jane Smith");
    }

    #[test]
    fn test_top_up_request_accepts_numbers() {
        let request: TopUpRequest =
            serde_json::from_str(r#"{"account": "a", "amount": 200, "currency": "USD"}"#).unwrap();
        assert_eq!(request.amount, Decimal::new(200, 0));
    }
}
