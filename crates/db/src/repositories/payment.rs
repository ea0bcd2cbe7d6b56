//! Payment repository.
//!
//! Payments are append-only. The only mutation is the status transition the
//! engine performs inside the unit of work that created the payment.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use paylane_core::payment::{Channel, Payment, PaymentKind, PaymentStatus, RecipientDetails};
use paylane_shared::types::{AccountId, CurrencyCode, PaymentId};

use super::corrupt_row;
use crate::entities::{payment_recipients, payments};

/// Input for creating a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Identifier reserved by the caller.
    pub id: PaymentId,
    /// Account debited (or credited, for top-ups).
    pub from_account: AccountId,
    /// Account credited; equal to `from_account` for top-ups and external sends.
    pub to_account: AccountId,
    /// Currency of the amount.
    pub currency: CurrencyCode,
    /// Positive amount.
    pub amount: Decimal,
    /// Initial status.
    pub status: PaymentStatus,
    /// Classification; also decides the description.
    pub kind: PaymentKind,
}

/// Input for recording the recipient of an external send.
#[derive(Debug, Clone)]
pub struct CreateRecipientInput {
    /// Payment the recipient belongs to.
    pub payment_id: PaymentId,
    /// Channel the funds left through.
    pub channel: Channel,
    /// Recipient echo.
    pub recipient: RecipientDetails,
    /// Status reported by the settlement provider.
    pub provider_status: String,
    /// Provider-side reference.
    pub provider_reference: String,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a payment inside the caller's unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        txn: &DatabaseTransaction,
        input: CreatePaymentInput,
    ) -> Result<Payment, DbErr> {
        let now = Utc::now().into();

        let payment = payments::ActiveModel {
            id: Set(input.id.into_inner()),
            from_account: Set(input.from_account.into_inner()),
            to_account: Set(input.to_account.into_inner()),
            currency: Set(input.currency.as_str().to_string()),
            amount: Set(input.amount),
            status: Set(input.status.as_str().to_string()),
            kind: Set(input.kind.as_str().to_string()),
            description: Set(input.kind.description().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        Payment::try_from(payment)
    }

    /// Transitions a payment to `status` inside the caller's unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment does not exist, is already in a
    /// different final status, or the update fails.
    pub async fn mark_status(
        &self,
        txn: &DatabaseTransaction,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<Payment, DbErr> {
        let model = payments::Entity::find_by_id(id.into_inner())
            .one(txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("payment {id}")))?;

        let current = parse_status(&model.status)?;
        if current == status {
            return Payment::try_from(model);
        }
        if current.is_final() {
            return Err(DbErr::Custom(format!(
                "payment {id} is already {current}, cannot move to {status}"
            )));
        }

        let mut active = model.into_active_model();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now().into());

        Payment::try_from(active.update(txn).await?)
    }

    /// Finds a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DbErr> {
        payments::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(Payment::try_from)
            .transpose()
    }

    /// Lists payments that debited or credited an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Payment>, DbErr> {
        payments::Entity::find()
            .filter(touches(account_id))
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Payment::try_from)
            .collect()
    }

    /// Counts payments that debited or credited an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_for_account(&self, account_id: AccountId) -> Result<u64, DbErr> {
        payments::Entity::find()
            .filter(touches(account_id))
            .count(&self.db)
            .await
    }

    /// Records the recipient of an external send inside the caller's unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_recipient(
        &self,
        txn: &DatabaseTransaction,
        input: CreateRecipientInput,
    ) -> Result<payment_recipients::Model, DbErr> {
        payment_recipients::ActiveModel {
            payment_id: Set(input.payment_id.into_inner()),
            channel: Set(input.channel.as_str().to_string()),
            recipient_number: Set(input.recipient.number),
            recipient_name: Set(input.recipient.name),
            provider_status: Set(input.provider_status),
            provider_reference: Set(input.provider_reference),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await
    }

    /// Finds the recipient recorded for an external send.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_recipient(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<payment_recipients::Model>, DbErr> {
        payment_recipients::Entity::find_by_id(payment_id.into_inner())
            .one(&self.db)
            .await
    }
}

fn touches(account_id: AccountId) -> Condition {
    let id = account_id.into_inner();
    Condition::any()
        .add(payments::Column::FromAccount.eq(id))
        .add(payments::Column::ToAccount.eq(id))
}

fn parse_status(raw: &str) -> Result<PaymentStatus, DbErr> {
    match raw {
        "pending" => Ok(PaymentStatus::Pending),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(corrupt_row("payments", format!("unknown status '{other}'"))),
    }
}

fn parse_kind(raw: &str) -> Result<PaymentKind, DbErr> {
    match raw {
        "internal" => Ok(PaymentKind::Internal),
        "external" => Ok(PaymentKind::External),
        "top_up" => Ok(PaymentKind::TopUp),
        other => Err(corrupt_row("payments", format!("unknown kind '{other}'"))),
    }
}

impl TryFrom<payments::Model> for Payment {
    type Error = DbErr;

    fn try_from(model: payments::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::from_uuid(model.id),
            from_account: AccountId::from_uuid(model.from_account),
            to_account: AccountId::from_uuid(model.to_account),
            currency: CurrencyCode::parse(&model.currency)
                .map_err(|err| corrupt_row("payments", err))?,
            amount: model.amount,
            status: parse_status(&model.status)?,
            kind: parse_kind(&model.kind)?,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}
