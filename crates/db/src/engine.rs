//! Transfer engine.
//!
//! Executes internal transfers, external sends and top-ups. Each operation
//! runs in exactly one database transaction under the configured deadline:
//! either every balance mutation, payment record and ledger entry commits, or
//! none of them does. Debits rely on a single-statement compare-and-decrement,
//! so concurrent callers need no in-process lock. Every touched account row is
//! locked in id order first, so opposite transfers queue instead of deadlocking.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use paylane_core::payment::{
    Account, AccountBalance, ExternalPaymentRequest, ExternalPaymentResult, ExternalTransfer,
    InternalTransfer, InternalTransferRequest, Payment, PaymentError, PaymentKind,
    PaymentStatus, SettlementChannel, SettlementInstruction, TopUp, TopUpRequest, TopUpResult,
    parse_account_id, plan_postings,
};
use paylane_shared::config::EngineConfig;
use paylane_shared::types::{AccountId, CurrencyCode, PaymentId};

use crate::repositories::{
    AccountRepository, CreatePaymentInput, CreateRecipientInput, LedgerRepository,
    PaymentRepository,
};

/// Status reported to callers once an external send or top-up has committed.
const SUCCESS: &str = "success";

/// Maps any storage error to `StorageFailure`, keeping the detail for logs.
fn storage_failure(err: DbErr) -> PaymentError {
    PaymentError::StorageFailure(err.to_string())
}

/// Moves funds between accounts and across the system boundary.
#[derive(Clone)]
pub struct TransferEngine {
    db: DatabaseConnection,
    settlement: Arc<dyn SettlementChannel>,
    config: EngineConfig,
    accounts: AccountRepository,
    payments: PaymentRepository,
    ledger: LedgerRepository,
}

impl std::fmt::Debug for TransferEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferEngine")
            .field("settlement", &self.settlement.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TransferEngine {
    /// Creates an engine over an injected connection and settlement channel.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        settlement: Arc<dyn SettlementChannel>,
        config: EngineConfig,
    ) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            payments: PaymentRepository::new(db.clone()),
            ledger: LedgerRepository::new(db.clone()),
            db,
            settlement,
            config,
        }
    }

    /// Moves `amount` from one account to another.
    ///
    /// Returns the committed payment with status `completed`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`, `InvalidCurrency`, `SameAccount` before any storage access
    /// - `AccountNotFound` if either account does not resolve
    /// - `CurrencyMismatch` if either account holds another currency
    /// - `InsufficientBalance` if the source cannot cover the amount
    /// - `Cancelled` if the deadline elapses, `StorageFailure` otherwise
    pub async fn internal_transfer(
        &self,
        request: &InternalTransferRequest,
    ) -> Result<Payment, PaymentError> {
        let command = InternalTransfer::try_from(request)?;
        let result = self.with_deadline(self.run_internal(command)).await;
        report("internal_transfer", result)
    }

    /// Sends `amount` from an account to an external recipient.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`, `UnsupportedChannel`, `InvalidCurrency` before any storage access
    /// - `AccountNotFound`, `CurrencyMismatch`, `InsufficientBalance` as for transfers
    /// - `SettlementFailed` if the settlement channel rejects the send
    /// - `SettlementUnconfirmed` if the send reached the channel and the unit of
    ///   work was then discarded; such a payment must not be retried blindly
    /// - `Cancelled` if the deadline elapses, `StorageFailure` otherwise
    pub async fn external_payment(
        &self,
        request: &ExternalPaymentRequest,
    ) -> Result<ExternalPaymentResult, PaymentError> {
        let command = ExternalTransfer::try_from(request)?;
        let payment_id = PaymentId::new();
        let submitted = AtomicBool::new(false);

        let result = self
            .with_deadline(self.run_external(payment_id, command, &submitted))
            .await
            .map_err(|err| after_submit(err, payment_id, submitted.load(Ordering::Acquire)));
        report("external_payment", result)
    }

    /// Credits `amount` to an account from an external source.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`, `InvalidCurrency` before any storage access
    /// - `AccountNotFound`, `CurrencyMismatch`
    /// - `Cancelled` if the deadline elapses, `StorageFailure` otherwise
    pub async fn top_up(&self, request: &TopUpRequest) -> Result<TopUpResult, PaymentError> {
        let command = TopUp::try_from(request)?;
        let result = self.with_deadline(self.run_top_up(command)).await;
        report("top_up", result)
    }

    /// Reads the current balance of an account.
    ///
    /// The value is a snapshot; the engine never relies on it for debits.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the identifier does not resolve.
    pub async fn current_balance(&self, account_id: &str) -> Result<AccountBalance, PaymentError> {
        let id = parse_account_id(account_id)?;
        self.accounts
            .current_balance(id)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| PaymentError::AccountNotFound(account_id.to_string()))
    }

    /// Runs one unit of work under the configured deadline.
    ///
    /// On expiry the future is dropped, which drops its open transaction and
    /// rolls it back.
    async fn with_deadline<T>(
        &self,
        work: impl Future<Output = Result<T, PaymentError>>,
    ) -> Result<T, PaymentError> {
        let deadline = self.config.operation_timeout();
        match tokio::time::timeout(deadline, work).await {
            Ok(result) => result,
            Err(_) => Err(PaymentError::Cancelled(
                u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    async fn run_internal(&self, command: InternalTransfer) -> Result<Payment, PaymentError> {
        let InternalTransfer {
            from_account,
            to_account,
            amount,
            currency,
        } = command;

        let txn = self.db.begin().await.map_err(storage_failure)?;

        let locked = self.lock(&txn, &[from_account, to_account]).await?;
        ensure_currency(locked_account(&locked, from_account)?, &currency)?;
        ensure_currency(locked_account(&locked, to_account)?, &currency)?;

        self.debit(&txn, from_account, amount).await?;
        self.credit(&txn, to_account, amount).await?;

        let payment_id = PaymentId::new();
        self.payments
            .create(
                &txn,
                CreatePaymentInput {
                    id: payment_id,
                    from_account,
                    to_account,
                    currency,
                    amount,
                    status: PaymentStatus::Pending,
                    kind: PaymentKind::Internal,
                },
            )
            .await
            .map_err(storage_failure)?;

        let postings = plan_postings(PaymentKind::Internal, from_account, to_account, amount);
        self.ledger
            .append(&txn, payment_id, &postings)
            .await
            .map_err(storage_failure)?;

        let payment = self
            .payments
            .mark_status(&txn, payment_id, PaymentStatus::Completed)
            .await
            .map_err(storage_failure)?;

        txn.commit().await.map_err(storage_failure)?;

        tracing::info!(
            payment_id = %payment.id,
            from_account = %from_account,
            to_account = %to_account,
            amount = %amount,
            currency = %payment.currency,
            "Internal transfer completed"
        );

        Ok(payment)
    }

    async fn run_external(
        &self,
        payment_id: PaymentId,
        command: ExternalTransfer,
        submitted: &AtomicBool,
    ) -> Result<ExternalPaymentResult, PaymentError> {
        let ExternalTransfer {
            from_account,
            amount,
            currency,
            channel,
            recipient,
        } = command;

        let txn = self.db.begin().await.map_err(storage_failure)?;

        let locked = self.lock(&txn, &[from_account]).await?;
        ensure_currency(locked_account(&locked, from_account)?, &currency)?;
        self.debit(&txn, from_account, amount).await?;

        self.payments
            .create(
                &txn,
                CreatePaymentInput {
                    id: payment_id,
                    from_account,
                    to_account: from_account,
                    currency: currency.clone(),
                    amount,
                    status: PaymentStatus::Completed,
                    kind: PaymentKind::External,
                },
            )
            .await
            .map_err(storage_failure)?;

        let postings = plan_postings(PaymentKind::External, from_account, from_account, amount);
        self.ledger
            .append(&txn, payment_id, &postings)
            .await
            .map_err(storage_failure)?;

        // Only the receipt and the commit remain once the provider is involved.
        let instruction = SettlementInstruction {
            payment_id,
            from_account,
            amount,
            currency,
            channel,
            recipient: recipient.clone(),
        };
        submitted.store(true, Ordering::Release);
        let receipt = self.settlement.submit(&instruction).await?;

        self.payments
            .create_recipient(
                &txn,
                CreateRecipientInput {
                    payment_id,
                    channel,
                    recipient: recipient.clone(),
                    provider_status: receipt.provider_status.clone(),
                    provider_reference: receipt.provider_reference,
                },
            )
            .await
            .map_err(storage_failure)?;

        txn.commit().await.map_err(storage_failure)?;

        tracing::info!(
            payment_id = %payment_id,
            from_account = %from_account,
            channel = %channel,
            amount = %amount,
            settlement = self.settlement.name(),
            "External payment completed"
        );

        Ok(ExternalPaymentResult {
            payment_id,
            recipient,
            status: SUCCESS.to_string(),
            provider_status: receipt.provider_status,
        })
    }

    async fn run_top_up(&self, command: TopUp) -> Result<TopUpResult, PaymentError> {
        let TopUp {
            account,
            amount,
            currency,
        } = command;

        let txn = self.db.begin().await.map_err(storage_failure)?;

        let locked = self.lock(&txn, &[account]).await?;
        ensure_currency(locked_account(&locked, account)?, &currency)?;
        self.credit(&txn, account, amount).await?;

        let payment_id = PaymentId::new();
        self.payments
            .create(
                &txn,
                CreatePaymentInput {
                    id: payment_id,
                    from_account: account,
                    to_account: account,
                    currency,
                    amount,
                    status: PaymentStatus::Completed,
                    kind: PaymentKind::TopUp,
                },
            )
            .await
            .map_err(storage_failure)?;

        let postings = plan_postings(PaymentKind::TopUp, account, account, amount);
        self.ledger
            .append(&txn, payment_id, &postings)
            .await
            .map_err(storage_failure)?;

        txn.commit().await.map_err(storage_failure)?;

        tracing::info!(
            payment_id = %payment_id,
            account = %account,
            amount = %amount,
            "Top-up completed"
        );

        Ok(TopUpResult {
            payment_id,
            status: SUCCESS.to_string(),
        })
    }

    async fn lock(
        &self,
        txn: &DatabaseTransaction,
        ids: &[AccountId],
    ) -> Result<Vec<Account>, PaymentError> {
        self.accounts
            .lock_for_update(txn, ids)
            .await
            .map_err(storage_failure)
    }

    async fn debit(
        &self,
        txn: &DatabaseTransaction,
        id: AccountId,
        amount: Decimal,
    ) -> Result<(), PaymentError> {
        let rows = self
            .accounts
            .conditional_debit(txn, id, amount)
            .await
            .map_err(storage_failure)?;

        if rows == 0 {
            return Err(PaymentError::InsufficientBalance(id));
        }
        Ok(())
    }

    async fn credit(
        &self,
        txn: &DatabaseTransaction,
        id: AccountId,
        amount: Decimal,
    ) -> Result<(), PaymentError> {
        let rows = self
            .accounts
            .credit(txn, id, amount)
            .await
            .map_err(storage_failure)?;

        if rows == 0 {
            return Err(PaymentError::AccountNotFound(id.to_string()));
        }
        Ok(())
    }
}

fn locked_account(locked: &[Account], id: AccountId) -> Result<&Account, PaymentError> {
    locked
        .iter()
        .find(|account| account.id == id)
        .ok_or_else(|| PaymentError::AccountNotFound(id.to_string()))
}

/// A retryable failure after the send reached the channel cannot be retried
/// safely: the provider may already have paid out.
fn after_submit(err: PaymentError, payment_id: PaymentId, submitted: bool) -> PaymentError {
    if submitted && err.is_retryable() {
        PaymentError::SettlementUnconfirmed(payment_id)
    } else {
        err
    }
}

fn report<T>(operation: &'static str, result: Result<T, PaymentError>) -> Result<T, PaymentError> {
    if let Err(err) = &result {
        if err.is_retryable() || matches!(err, PaymentError::SettlementUnconfirmed(_)) {
            tracing::error!(operation, error = %err, "Payment operation failed");
        } else {
            tracing::warn!(
                operation,
                code = err.error_code(),
                error = %err,
                "Payment operation rejected"
            );
        }
    }
    result
}

fn ensure_currency(account: &Account, currency: &CurrencyCode) -> Result<(), PaymentError> {
    if account.currency == *currency {
        Ok(())
    } else {
        Err(PaymentError::CurrencyMismatch {
            account: account.id,
            expected: account.currency.clone(),
            actual: currency.clone(),
        })
    }
}
