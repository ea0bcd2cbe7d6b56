//! `SeaORM` entity definitions.

pub mod accounts;
pub mod ledger_entries;
pub mod payment_recipients;
pub mod payments;

pub mod prelude {
    //! Entity aliases.

    pub use super::accounts::Entity as Accounts;
    pub use super::ledger_entries::Entity as LedgerEntries;
    pub use super::payment_recipients::Entity as PaymentRecipients;
    pub use super::payments::Entity as Payments;
}
