//! Account repository.
//!
//! Balances only change through `conditional_debit` and `credit`, both of
//! which require an open transaction.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};

use paylane_core::payment::{Account, AccountBalance};
use paylane_shared::types::{AccountId, CurrencyCode, UserId};

use super::corrupt_row;
use crate::entities::accounts;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning user.
    pub user_id: UserId,
    /// Currency fixed for the lifetime of the account.
    pub currency: CurrencyCode,
    /// Opening balance, must not be negative.
    pub opening_balance: Decimal,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with its opening balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening balance is negative or the insert fails.
    pub async fn create(&self, input: CreateAccountInput) -> Result<Account, DbErr> {
        if input.opening_balance < Decimal::ZERO {
            return Err(DbErr::Custom(format!(
                "opening balance must not be negative: {}",
                input.opening_balance
            )));
        }

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            user_id: Set(input.user_id.into_inner()),
            currency: Set(input.currency.as_str().to_string()),
            balance: Set(input.opening_balance),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            account_id = %account.id,
            currency = %account.currency,
            "Account created"
        );

        Account::try_from(account)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DbErr> {
        self.find_by_id_in(&self.db, id).await
    }

    /// Finds an account by ID on the given connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: AccountId,
    ) -> Result<Option<Account>, DbErr> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(conn)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    /// Locks the given accounts for the rest of the transaction.
    ///
    /// Rows are locked in ascending id order, so two units of work touching
    /// the same pair of accounts always queue instead of deadlocking. Missing
    /// ids are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn lock_for_update(
        &self,
        txn: &DatabaseTransaction,
        ids: &[AccountId],
    ) -> Result<Vec<Account>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .order_by_asc(accounts::Column::Id)
            .lock_exclusive()
            .all(txn)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    /// Reads the current balance snapshot of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn current_balance(&self, id: AccountId) -> Result<Option<AccountBalance>, DbErr> {
        Ok(self.find_by_id(id).await?.map(|account| AccountBalance {
            account_id: account.id,
            balance: account.balance,
            currency: account.currency,
        }))
    }

    /// Debits `amount` only if the balance covers it, in a single statement.
    ///
    /// Returns the number of rows affected: zero means the account is missing
    /// or its balance is too low.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn conditional_debit(
        &self,
        txn: &DatabaseTransaction,
        id: AccountId,
        amount: Decimal,
    ) -> Result<u64, DbErr> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).sub(amount),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(now()))
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .filter(accounts::Column::Balance.gte(amount))
            .exec(txn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Credits `amount` unconditionally.
    ///
    /// Returns the number of rows affected: zero means the account is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn credit(
        &self,
        txn: &DatabaseTransaction,
        id: AccountId,
        amount: Decimal,
    ) -> Result<u64, DbErr> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(amount),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(now()))
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .exec(txn)
            .await?;

        Ok(result.rows_affected)
    }
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

impl TryFrom<accounts::Model> for Account {
    type Error = DbErr;

    fn try_from(model: accounts::Model) -> Result<Self, Self::Error> {
        let currency =
            CurrencyCode::parse(&model.currency).map_err(|err| corrupt_row("accounts", err))?;

        Ok(Self {
            id: AccountId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            currency,
            balance: model.balance,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}
