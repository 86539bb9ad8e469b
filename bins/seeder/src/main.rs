//! Database seeder for Pokerledger development.
//!
//! Seeds a demo user with one settled four-player game session.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use pokerledger_core::auth::hash_password;
use pokerledger_core::settlement::PlayerAmounts;
use pokerledger_db::entities::{sea_orm_active_enums::EntryMode, users};
use pokerledger_db::repositories::{CreateGameSessionInput, CreatePlayerInput};
use pokerledger_db::{GameSessionRepository, PlayerRepository, SettlementRepository, UserRepository};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = pokerledger_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding demo user...");
    let Some(user) = seed_demo_user(&db).await? else {
        println!("  Demo user already exists, skipping...");
        return Ok(());
    };

    println!("Seeding demo game session...");
    seed_demo_session(&db, &user).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Creates the demo user unless the email is already registered.
async fn seed_demo_user(db: &DatabaseConnection) -> anyhow::Result<Option<users::Model>> {
    let repo = UserRepository::new(db.clone());
    if repo.find_by_email(DEMO_EMAIL).await?.is_some() {
        return Ok(None);
    }

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let user = repo.create(DEMO_EMAIL, DEMO_USERNAME, &password_hash).await?;
    println!("  Created demo user: {DEMO_USERNAME} / {DEMO_PASSWORD}");
    Ok(Some(user))
}

/// Creates a four-player session and settles it.
async fn seed_demo_session(db: &DatabaseConnection, user: &users::Model) -> anyhow::Result<()> {
    let session = GameSessionRepository::new(db.clone())
        .create(
            user.id,
            CreateGameSessionInput {
                title: "Friday Night Hold'em".to_string(),
                description: Some("Demo session with four players".to_string()),
                game_date: (Utc::now() - Duration::days(1)).fixed_offset(),
            },
        )
        .await?;

    let players = [
        (
            "Alice",
            PlayerAmounts::new(Decimal::from(50), Decimal::from(120)),
            EntryMode::BuyinCashout,
        ),
        ("Bob", PlayerAmounts::from_pnl(Decimal::from(30)), EntryMode::Pnl),
        (
            "Carol",
            PlayerAmounts::new(Decimal::from(60), Decimal::from(20)),
            EntryMode::BuyinCashout,
        ),
        ("Dave", PlayerAmounts::from_pnl(Decimal::from(-60)), EntryMode::Pnl),
    ];

    let repo = PlayerRepository::new(db.clone());
    for (name, amounts, entry_mode) in players {
        repo.add_player(
            session.id,
            user.id,
            CreatePlayerInput {
                name: name.to_string(),
                amounts,
                entry_mode,
            },
        )
        .await?;
    }

    let settlements = SettlementRepository::new(db.clone())
        .settle_session(session.id, user.id)
        .await?;

    println!("  Created session '{}' with {} transfers", session.title, settlements.len());
    for transfer in &settlements {
        println!(
            "    {} pays {} {}",
            transfer.from_player,
            transfer.to_player,
            pokerledger_shared::types::from_minor_units(transfer.amount_minor)
        );
    }

    Ok(())
}
