//! Initial schema: accounts, payments, ledger entries and external recipients.
//!
//! Built with the schema builder. Decimal columns carry no precision, which
//! Postgres turns into arbitrary-precision `NUMERIC`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Currency).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .decimal()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Accounts::Balance).gte(0)),
                    )
                    .col(timestamp(Accounts::CreatedAt))
                    .col(timestamp(Accounts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_user")
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::FromAccount).uuid().not_null())
                    .col(ColumnDef::new(Payments::ToAccount).uuid().not_null())
                    .col(ColumnDef::new(Payments::Currency).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Payments::Amount)
                            .decimal()
                            .not_null()
                            .check(Expr::col(Payments::Amount).gt(0)),
                    )
                    .col(ColumnDef::new(Payments::Status).text().not_null())
                    .col(ColumnDef::new(Payments::Kind).text().not_null())
                    .col(ColumnDef::new(Payments::Description).text().not_null())
                    .col(timestamp(Payments::CreatedAt))
                    .col(timestamp(Payments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_from_account")
                            .from(Payments::Table, Payments::FromAccount)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_to_account")
                            .from(Payments::Table, Payments::ToAccount)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_from_account")
                    .table(Payments::Table)
                    .col(Payments::FromAccount)
                    .col(Payments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_to_account")
                    .table(Payments::Table)
                    .col(Payments::ToAccount)
                    .col(Payments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LedgerEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(LedgerEntries::AccountId).uuid().not_null())
                    .col(ColumnDef::new(LedgerEntries::PaymentId).uuid().not_null())
                    .col(ColumnDef::new(LedgerEntries::Amount).decimal().not_null())
                    .col(timestamp(LedgerEntries::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entries_account")
                            .from(LedgerEntries::Table, LedgerEntries::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entries_payment")
                            .from(LedgerEntries::Table, LedgerEntries::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entries_account")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::AccountId)
                    .col(LedgerEntries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entries_payment")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::PaymentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentRecipients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentRecipients::PaymentId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentRecipients::Channel).text().not_null())
                    .col(
                        ColumnDef::new(PaymentRecipients::RecipientNumber)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentRecipients::RecipientName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentRecipients::ProviderStatus)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentRecipients::ProviderReference)
                            .text()
                            .not_null(),
                    )
                    .col(timestamp(PaymentRecipients::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_recipients_payment")
                            .from(PaymentRecipients::Table, PaymentRecipients::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentRecipients::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Currency,
    Balance,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    FromAccount,
    ToAccount,
    Currency,
    Amount,
    Status,
    Kind,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LedgerEntries {
    Table,
    Id,
    AccountId,
    PaymentId,
    Amount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentRecipients {
    Table,
    PaymentId,
    Channel,
    RecipientNumber,
    RecipientName,
    ProviderStatus,
    ProviderReference,
    CreatedAt,
}
