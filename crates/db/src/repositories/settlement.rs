//! Settlement repository.
//!
//! `settle_session` recomputes a session's transfers from its current players
//! and replaces the stored set in one database transaction. Any failure drops
//! the transaction, so the previous set stays in place.

use chrono::Utc;
use pokerledger_core::settlement::{LedgerEntry, SettlementError, SettlementService};
use pokerledger_shared::types::{MoneyError, SettlementId, from_minor_units, to_minor_units};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::game_session::{GameSessionError, find_owned, players_in_order, settlements_in_order};
use crate::entities::{game_sessions, players, settlements};

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    /// Session is missing or belongs to someone else.
    #[error(transparent)]
    Session(#[from] GameSessionError),

    /// Settlement computation failed.
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// A stored amount could not be converted.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Transfer count does not fit the position column.
    #[error("Too many transfers: {0}")]
    TooManyTransfers(usize),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl SettleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Session(e) => e.error_code(),
            Self::Settlement(e) => e.error_code(),
            Self::Money(_) => "INVALID_AMOUNT",
            Self::TooManyTransfers(_) => "INTERNAL_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Session(e) => e.http_status_code(),
            Self::Settlement(e) => e.http_status_code(),
            Self::Money(_) => 400,
            Self::TooManyTransfers(_) | Self::Database(_) => 500,
        }
    }
}

/// Builds ledger entries from stored players, in the given order.
#[must_use]
pub fn ledger_entries(players: &[players::Model]) -> Vec<LedgerEntry> {
    players
        .iter()
        .map(|p| {
            LedgerEntry::new(
                p.name.clone(),
                from_minor_units(p.buy_in_minor),
                from_minor_units(p.cash_out_minor),
            )
        })
        .collect()
}

/// Settlement repository.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recomputes and stores the settlement of one of the owner's sessions.
    ///
    /// 1. Locks the session row and checks existence and ownership
    /// 2. Reads players in insertion order
    /// 3. Computes the plan
    /// 4. Replaces stored settlements and marks the session settled
    ///
    /// Calling it twice on unchanged players stores an identical list.
    ///
    /// # Errors
    ///
    /// Returns a session error, a settlement error, or a database error. No
    /// change is committed on error.
    pub async fn settle_session(
        &self,
        session_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<settlements::Model>, SettleError> {
        let txn = self.db.begin().await?;

        let session = find_owned(&txn, session_id, owner_id, true).await?;
        let players = players_in_order(&txn, session_id).await?;
        debug!(session_id = %session_id, players = players.len(), "Settling game session");

        let plan = SettlementService::plan(&ledger_entries(&players))?;

        settlements::Entity::delete_many()
            .filter(settlements::Column::GameSessionId.eq(session_id))
            .exec(&txn)
            .await?;

        let now = Utc::now().fixed_offset();
        let mut stored = Vec::with_capacity(plan.transfers.len());
        for (index, transfer) in plan.transfers.iter().enumerate() {
            let position = i32::try_from(index)
                .map_err(|_| SettleError::TooManyTransfers(plan.transfers.len()))?;
            let model = settlements::ActiveModel {
                id: Set(SettlementId::new().into_inner()),
                game_session_id: Set(session_id),
                position: Set(position),
                from_player: Set(transfer.from_name.clone()),
                to_player: Set(transfer.to_name.clone()),
                amount_minor: Set(to_minor_units(transfer.amount)?),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            stored.push(model);
        }

        let mut active: game_sessions::ActiveModel = session.into();
        active.is_settled = Set(true);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            session_id = %session_id,
            transfers = stored.len(),
            total = %plan.total_transferred(),
            "Game session settled"
        );

        Ok(stored)
    }

    /// Lists the stored settlements of one of the owner's sessions.
    ///
    /// # Errors
    ///
    /// Returns a session error or a database error.
    pub async fn list_for_session(
        &self,
        session_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<settlements::Model>, SettleError> {
        find_owned(&self.db, session_id, owner_id, false).await?;
        Ok(settlements_in_order(&self.db, session_id).await?)
    }
}
