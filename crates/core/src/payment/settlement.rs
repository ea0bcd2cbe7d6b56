//! Settlement channel for external sends.
//!
//! The engine hands the instruction to a `SettlementChannel` while its unit
//! of work is still open. A rejection discards the debit. The default
//! `InstantSettlement` settles in-process; a provider-backed channel can be
//! injected without changing the engine's transactional shape.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use paylane_shared::types::{AccountId, CurrencyCode, PaymentId};

use super::types::{Channel, RecipientDetails};

/// What the channel is asked to settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementInstruction {
    /// Payment identifier reserved for this send.
    pub payment_id: PaymentId,
    /// Account the funds were debited from.
    pub from_account: AccountId,
    /// Positive amount leaving the system.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: CurrencyCode,
    /// External channel.
    pub channel: Channel,
    /// Who receives the funds.
    pub recipient: RecipientDetails,
}

/// Provider confirmation of a settled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    /// Status reported by the provider.
    pub provider_status: String,
    /// Provider-side reference for reconciliation.
    pub provider_reference: String,
}

/// Errors reported by a settlement channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Provider refused the instruction.
    #[error("Settlement rejected: {0}")]
    Rejected(String),

    /// Provider could not be reached.
    #[error("Settlement provider unavailable: {0}")]
    Unavailable(String),
}

/// Submits an external send and awaits settlement or failure.
#[async_trait]
pub trait SettlementChannel: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Settles the instruction or reports why it could not be settled.
    async fn submit(
        &self,
        instruction: &SettlementInstruction,
    ) -> Result<SettlementReceipt, SettlementError>;
}

/// Settles every instruction immediately in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSettlement;

#[async_trait]
impl SettlementChannel for InstantSettlement {
    fn name(&self) -> &'static str {
        "instant"
    }

    async fn submit(
        &self,
        instruction: &SettlementInstruction,
    ) -> Result<SettlementReceipt, SettlementError> {
        tracing::debug!(
            payment_id = %instruction.payment_id,
            channel = %instruction.channel,
            amount = %instruction.amount,
            "Settling external payment in-process"
        );

        Ok(SettlementReceipt {
            provider_status: "success".to_string(),
            provider_reference: format!("{}-{}", instruction.channel, instruction.payment_id),
        })
    }
}
