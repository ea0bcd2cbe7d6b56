//! Database seeder for Paylane development and testing.
//!
//! Seeds a fixed set of demo accounts so the payment endpoints can be
//! exercised locally. Running it twice leaves existing accounts untouched.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use paylane_db::entities::accounts;
use paylane_shared::AppConfig;

/// Demo accounts: (account id, owning user id, currency, opening balance).
const DEMO_ACCOUNTS: &[(&str, &str, &str, &str)] = &[
    (
        "00000000-0000-7000-8000-000000000101",
        "00000000-0000-7000-8000-000000000001",
        "USD",
        "1000.00",
    ),
    (
        "00000000-0000-7000-8000-000000000102",
        "00000000-0000-7000-8000-000000000002",
        "USD",
        "500.00",
    ),
    (
        "00000000-0000-7000-8000-000000000103",
        "00000000-0000-7000-8000-000000000003",
        "KES",
        "25000.00",
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = paylane_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding demo accounts...");
    for &(id, user_id, currency, balance) in DEMO_ACCOUNTS {
        seed_account(&db, id, user_id, currency, balance).await?;
    }

    println!("Seeding complete!");
    Ok(())
}

/// Inserts one demo account unless it already exists.
async fn seed_account(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
    currency: &str,
    balance: &str,
) -> anyhow::Result<()> {
    let id = Uuid::parse_str(id)?;

    if accounts::Entity::find_by_id(id).one(db).await?.is_some() {
        println!("  Account {id} already exists, skipping...");
        return Ok(());
    }

    let now = Utc::now().into();
    accounts::ActiveModel {
        id: Set(id),
        user_id: Set(Uuid::parse_str(user_id)?),
        currency: Set(currency.to_string()),
        balance: Set(Decimal::from_str(balance)?),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .with_context(|| format!("Failed to insert account {id}"))?;

    println!("  Created {currency} account {id} with balance {balance}");
    Ok(())
}
