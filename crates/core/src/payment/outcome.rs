//! Response envelope returned to callers.

use serde::{Deserialize, Serialize};

use paylane_shared::types::{CorrelationId, PaymentId};

use super::error::PaymentError;
use super::types::{ExternalPaymentResult, Payment, RecipientDetails, TopUpResult};

/// Outcome of a payment operation, tagged for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum PaymentOutcome {
    /// The unit of work committed.
    Success(PaymentReceipt),
    /// The operation failed and nothing was committed.
    Failure(PaymentFailure),
}

/// Successful payment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Echoed so the caller can find the request in the logs.
    pub correlation_id: CorrelationId,
    /// Identifier of the committed payment.
    pub payment_id: PaymentId,
    /// Status string.
    pub status: String,
    /// Human-readable message.
    pub message: String,
    /// Full payment record, for internal transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    /// Recipient echo, for external sends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<RecipientDetails>,
    /// Settlement provider status, for external sends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<String>,
}

/// Failed payment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFailure {
    /// Echoed so the caller can find the request in the logs.
    pub correlation_id: CorrelationId,
    /// Machine-readable error code.
    pub code: String,
    /// Message safe to show to an end user.
    pub message: String,
}

impl PaymentOutcome {
    /// Wraps a committed internal transfer.
    #[must_use]
    pub fn internal(correlation_id: CorrelationId, payment: Payment) -> Self {
        Self::Success(PaymentReceipt {
            correlation_id,
            payment_id: payment.id,
            status: payment.status.to_string(),
            message: "Payment created successfully".to_string(),
            payment: Some(payment),
            recipient: None,
            provider_status: None,
        })
    }

    /// Wraps a committed external send.
    #[must_use]
    pub fn external(correlation_id: CorrelationId, result: ExternalPaymentResult) -> Self {
        Self::Success(PaymentReceipt {
            correlation_id,
            payment_id: result.payment_id,
            status: result.status,
            message: "Payment created successfully".to_string(),
            payment: None,
            recipient: Some(result.recipient),
            provider_status: Some(result.provider_status),
        })
    }

    /// Wraps a committed top-up.
    #[must_use]
    pub fn top_up(correlation_id: CorrelationId, result: TopUpResult) -> Self {
        Self::Success(PaymentReceipt {
            correlation_id,
            payment_id: result.payment_id,
            status: result.status,
            message: "topup successfully".to_string(),
            payment: None,
            recipient: None,
            provider_status: None,
        })
    }

    /// Wraps a failed operation without leaking internal details.
    #[must_use]
    pub fn failure(correlation_id: CorrelationId, err: &PaymentError) -> Self {
        Self::Failure(PaymentFailure {
            correlation_id,
            code: err.error_code().to_string(),
            message: err.user_message(),
        })
    }

    /// Returns true for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
