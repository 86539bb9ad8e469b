//! Shared setup for repository integration tests.

#![allow(dead_code)]

use chrono::{FixedOffset, TimeZone};
use pokerledger_core::settlement::PlayerAmounts;
use pokerledger_db::entities::{game_sessions, sea_orm_active_enums::EntryMode, users};
use pokerledger_db::repositories::{CreateGameSessionInput, CreatePlayerInput};
use pokerledger_db::{GameSessionRepository, Migrator, UserRepository};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

/// Connects to a fresh in-memory SQLite database and runs all migrations.
///
/// The pool holds a single connection so every query sees the same database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// Creates a user with a unique email and username.
pub async fn create_user(db: &DatabaseConnection) -> users::Model {
    let suffix = Uuid::new_v4().simple().to_string();
    UserRepository::new(db.clone())
        .create(
            &format!("player-{suffix}@example.com"),
            &format!("player_{}", &suffix[..12]),
            "$argon2id$test_hash",
        )
        .await
        .expect("Failed to create user")
}

/// Creates a game session owned by `owner_id`.
pub async fn create_session(db: &DatabaseConnection, owner_id: Uuid) -> game_sessions::Model {
    GameSessionRepository::new(db.clone())
        .create(
            owner_id,
            CreateGameSessionInput {
                title: "Friday Night".to_string(),
                description: None,
                game_date: FixedOffset::east_opt(0)
                    .unwrap()
                    .with_ymd_and_hms(2026, 10, 16, 20, 0, 0)
                    .unwrap(),
            },
        )
        .await
        .expect("Failed to create game session")
}

/// Player input with explicit buy-in and cash-out.
pub fn player(name: &str, buy_in: Decimal, cash_out: Decimal) -> CreatePlayerInput {
    CreatePlayerInput {
        name: name.to_string(),
        amounts: PlayerAmounts::new(buy_in, cash_out),
        entry_mode: EntryMode::BuyinCashout,
    }
}
