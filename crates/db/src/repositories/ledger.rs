//! Ledger repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use paylane_core::payment::{LedgerEntry, Posting};
use paylane_shared::types::{AccountId, LedgerEntryId, PaymentId};

use crate::entities::ledger_entries;

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends one entry per posting inside the caller's unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub async fn append(
        &self,
        txn: &DatabaseTransaction,
        payment_id: PaymentId,
        postings: &[Posting],
    ) -> Result<Vec<LedgerEntry>, DbErr> {
        let now = Utc::now().into();
        let mut entries = Vec::with_capacity(postings.len());

        for posting in postings {
            let entry = ledger_entries::ActiveModel {
                id: Set(LedgerEntryId::new().into_inner()),
                account_id: Set(posting.account_id.into_inner()),
                payment_id: Set(payment_id.into_inner()),
                amount: Set(posting.amount),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;

            entries.push(LedgerEntry::from(entry));
        }

        Ok(entries)
    }

    /// Lists the entries written for a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_payment(&self, payment_id: PaymentId) -> Result<Vec<LedgerEntry>, DbErr> {
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::PaymentId.eq(payment_id.into_inner()))
            .order_by_asc(ledger_entries::Column::Id)
            .all(&self.db)
            .await?;

        Ok(entries.into_iter().map(LedgerEntry::from).collect())
    }

    /// Lists the entries written against an account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_account(&self, account_id: AccountId) -> Result<Vec<LedgerEntry>, DbErr> {
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .order_by_asc(ledger_entries::Column::Id)
            .all(&self.db)
            .await?;

        Ok(entries.into_iter().map(LedgerEntry::from).collect())
    }
}

impl From<ledger_entries::Model> for LedgerEntry {
    fn from(model: ledger_entries::Model) -> Self {
        Self {
            id: LedgerEntryId::from_uuid(model.id),
            account_id: AccountId::from_uuid(model.account_id),
            payment_id: PaymentId::from_uuid(model.payment_id),
            amount: model.amount,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
