//! Shared fixtures for database integration tests.
//!
//! Tests run against Postgres: the database named by `DATABASE_URL`, or a
//! container started once per test binary when it is unset. The schema is
//! migrated once; every test opens its own pool and works on fresh accounts,
//! so tests never see each other's rows.

#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use paylane_core::payment::{
    Account, InstantSettlement, SettlementChannel, SettlementError, SettlementInstruction,
    SettlementReceipt,
};
use paylane_db::TransferEngine;
use paylane_db::migration::Migrator;
use paylane_db::repositories::{AccountRepository, CreateAccountInput};
use paylane_shared::config::EngineConfig;
use paylane_shared::types::{CurrencyCode, UserId};

static DATABASE_URL: OnceCell<String> = OnceCell::const_new();

async fn start_postgres() -> String {
    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start Postgres container");
    let host = container.get_host().await.expect("Failed to read container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to read container port");

    // Kept running for the whole test binary; the container reaper removes it.
    std::mem::forget(container);
    format!("postgres://postgres:postgres@{host}:{port}/postgres")
}

async fn database_url() -> &'static str {
    DATABASE_URL
        .get_or_init(|| async {
            let url = match env::var("DATABASE_URL") {
                Ok(url) => url,
                Err(_) => start_postgres().await,
            };

            let db = Database::connect(url.as_str())
                .await
                .expect("Failed to connect to test database");
            Migrator::up(&db, None)
                .await
                .expect("Failed to run migrations");
            db.close().await.expect("Failed to close migration connection");
            url
        })
        .await
}

/// Opens a pool on the migrated test database.
///
/// The pool holds several connections, so concurrent callers really do run
/// concurrent transactions.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new(database_url().await);
    options
        .max_connections(10)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .expect("Failed to connect to test database")
}

/// Engine with instant settlement and the default deadline.
pub fn engine(db: &DatabaseConnection) -> TransferEngine {
    engine_with(db, Arc::new(InstantSettlement), EngineConfig::default())
}

/// Engine with a custom settlement channel and configuration.
pub fn engine_with(
    db: &DatabaseConnection,
    settlement: Arc<dyn SettlementChannel>,
    config: EngineConfig,
) -> TransferEngine {
    TransferEngine::new(db.clone(), settlement, config)
}

/// Creates an account holding `balance` in `currency`.
pub async fn open_account(db: &DatabaseConnection, currency: &str, balance: Decimal) -> Account {
    AccountRepository::new(db.clone())
        .create(CreateAccountInput {
            user_id: UserId::new(),
            currency: CurrencyCode::parse(currency).expect("valid currency"),
            opening_balance: balance,
        })
        .await
        .expect("Failed to create account")
}

/// Reads the committed balance of an account.
pub async fn balance_of(db: &DatabaseConnection, account: &Account) -> Decimal {
    AccountRepository::new(db.clone())
        .find_by_id(account.id)
        .await
        .expect("Failed to read account")
        .expect("Account should exist")
        .balance
}

/// Settlement channel that refuses every instruction.
#[derive(Debug, Default)]
pub struct RejectingSettlement;

#[async_trait]
impl SettlementChannel for RejectingSettlement {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn submit(
        &self,
        _instruction: &SettlementInstruction,
    ) -> Result<SettlementReceipt, SettlementError> {
        Err(SettlementError::Rejected("recipient blocked".to_string()))
    }
}

/// Settlement channel that answers only after `delay`.
#[derive(Debug)]
pub struct SlowSettlement {
    pub delay: Duration,
}

#[async_trait]
impl SettlementChannel for SlowSettlement {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn submit(
        &self,
        instruction: &SettlementInstruction,
    ) -> Result<SettlementReceipt, SettlementError> {
        tokio::time::sleep(self.delay).await;
        Ok(SettlementReceipt {
            provider_status: "success".to_string(),
            provider_reference: instruction.payment_id.to_string(),
        })
    }
}
