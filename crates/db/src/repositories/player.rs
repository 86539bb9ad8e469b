//! Player repository.
//!
//! Converts decimal amounts to whole cents on the way in; sub-cent and
//! negative amounts are rejected before anything is written.

use chrono::Utc;
use pokerledger_core::settlement::{AmountField, PlayerAmounts, SettlementError, validate_amount};
use pokerledger_shared::types::{MoneyError, PlayerId, to_minor_units};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use super::game_session::{GameSessionError, find_owned};
use crate::entities::{game_sessions, players, sea_orm_active_enums::EntryMode};

/// Error types for player operations.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Player not found.
    #[error("Player not found: {0}")]
    NotFound(Uuid),

    /// Owning session is missing or belongs to someone else.
    #[error(transparent)]
    Session(#[from] GameSessionError),

    /// Amount is negative or out of range.
    #[error(transparent)]
    InvalidAmount(#[from] SettlementError),

    /// Amount is not a whole number of cents.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PlayerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "PLAYER_NOT_FOUND",
            Self::Session(e) => e.error_code(),
            Self::InvalidAmount(e) => e.error_code(),
            Self::Money(_) => "INVALID_AMOUNT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Session(e) => e.http_status_code(),
            Self::InvalidAmount(e) => e.http_status_code(),
            Self::Money(_) => 400,
            Self::Database(_) => 500,
        }
    }
}

/// Input for adding a player to a session.
#[derive(Debug, Clone)]
pub struct CreatePlayerInput {
    /// Player name.
    pub name: String,
    /// Buy-in and cash-out.
    pub amounts: PlayerAmounts,
    /// How the result was entered.
    pub entry_mode: EntryMode,
}

/// Input for updating a player. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlayerInput {
    /// New name.
    pub name: Option<String>,
    /// New buy-in.
    pub buy_in: Option<Decimal>,
    /// New cash-out.
    pub cash_out: Option<Decimal>,
    /// New entry mode.
    pub entry_mode: Option<EntryMode>,
}

/// Converts a validated amount to cents.
fn amount_to_minor(name: &str, field: AmountField, amount: Decimal) -> Result<i64, PlayerError> {
    validate_amount(name, field, amount)?;
    Ok(to_minor_units(amount)?)
}

/// Player repository.
#[derive(Debug, Clone)]
pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    /// Creates a new player repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a player to one of the owner's sessions.
    ///
    /// # Errors
    ///
    /// Returns a session error, an amount error, or a database error.
    pub async fn add_player(
        &self,
        session_id: Uuid,
        owner_id: Uuid,
        input: CreatePlayerInput,
    ) -> Result<players::Model, PlayerError> {
        let buy_in = amount_to_minor(&input.name, AmountField::Contributed, input.amounts.buy_in)?;
        let cash_out =
            amount_to_minor(&input.name, AmountField::Distributed, input.amounts.cash_out)?;

        let txn = self.db.begin().await?;
        find_owned(&txn, session_id, owner_id, true).await?;

        let now = Utc::now().fixed_offset();
        let player = players::ActiveModel {
            id: Set(PlayerId::new().into_inner()),
            game_session_id: Set(session_id),
            name: Set(input.name),
            buy_in_minor: Set(buy_in),
            cash_out_minor: Set(cash_out),
            entry_mode: Set(input.entry_mode),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(player)
    }

    /// Finds a player and checks the owning session belongs to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a session error, or a database error.
    pub async fn get_owned(
        &self,
        player_id: Uuid,
        owner_id: Uuid,
    ) -> Result<players::Model, PlayerError> {
        let player = players::Entity::find_by_id(player_id)
            .one(&self.db)
            .await?
            .ok_or(PlayerError::NotFound(player_id))?;

        find_owned(&self.db, player.game_session_id, owner_id, false).await?;
        Ok(player)
    }

    /// Applies a partial update to a player.
    ///
    /// The session's settled flag is left alone; settlements are refreshed
    /// only when recalculated.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a session error, an amount error, or a database error.
    pub async fn update_player(
        &self,
        player_id: Uuid,
        owner_id: Uuid,
        input: UpdatePlayerInput,
    ) -> Result<players::Model, PlayerError> {
        let player = self.get_owned(player_id, owner_id).await?;
        let name = input.name.clone().unwrap_or_else(|| player.name.clone());

        let buy_in = input
            .buy_in
            .map(|amount| amount_to_minor(&name, AmountField::Contributed, amount))
            .transpose()?;
        let cash_out = input
            .cash_out
            .map(|amount| amount_to_minor(&name, AmountField::Distributed, amount))
            .transpose()?;

        let mut active: players::ActiveModel = player.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(buy_in) = buy_in {
            active.buy_in_minor = Set(buy_in);
        }
        if let Some(cash_out) = cash_out {
            active.cash_out_minor = Set(cash_out);
        }
        if let Some(entry_mode) = input.entry_mode {
            active.entry_mode = Set(entry_mode);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a player.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a session error, or a database error.
    pub async fn delete_player(&self, player_id: Uuid, owner_id: Uuid) -> Result<(), PlayerError> {
        let player = self.get_owned(player_id, owner_id).await?;
        players::Entity::delete_by_id(player.id).exec(&self.db).await?;
        Ok(())
    }

    /// Distinct player names across all of the owner's sessions, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn unique_names(&self, owner_id: Uuid) -> Result<Vec<String>, PlayerError> {
        let names = players::Entity::find()
            .select_only()
            .column(players::Column::Name)
            .distinct()
            .join(JoinType::InnerJoin, players::Relation::GameSessions.def())
            .filter(game_sessions::Column::OwnerId.eq(owner_id))
            .order_by_asc(players::Column::Name)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(names)
    }
}
