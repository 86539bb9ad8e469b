//! Game session repository.
//!
//! Every read and write is scoped to the owning user.

use chrono::Utc;
use pokerledger_shared::types::{GameSessionId, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{game_sessions, players, settlements};

/// Error types for game session operations.
#[derive(Debug, thiserror::Error)]
pub enum GameSessionError {
    /// Game session not found.
    #[error("Game session not found: {0}")]
    NotFound(Uuid),

    /// Game session belongs to another user.
    #[error("Not enough permissions for game session {0}")]
    Forbidden(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl GameSessionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "GAME_SESSION_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Database(_) => 500,
        }
    }
}

/// Input for creating a game session.
#[derive(Debug, Clone)]
pub struct CreateGameSessionInput {
    /// Session title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the game was played.
    pub game_date: chrono::DateTime<chrono::FixedOffset>,
}

/// Input for updating a game session. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateGameSessionInput {
    /// New title.
    pub title: Option<String>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New game date.
    pub game_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// New settled flag.
    pub is_settled: Option<bool>,
}

/// A game session with its players and stored settlements.
#[derive(Debug, Clone)]
pub struct GameSessionWithDetails {
    /// Session record.
    pub session: game_sessions::Model,
    /// Players in insertion order.
    pub players: Vec<players::Model>,
    /// Settlements in emission order.
    pub settlements: Vec<settlements::Model>,
}

/// Loads a session and checks it belongs to `owner_id`.
///
/// With `lock` set the row is selected `FOR UPDATE` on PostgreSQL; SQLite
/// serialises writers itself.
pub(crate) async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    owner_id: Uuid,
    lock: bool,
) -> Result<game_sessions::Model, GameSessionError> {
    let mut query = game_sessions::Entity::find_by_id(id);
    if lock && conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }

    let session = query
        .one(conn)
        .await?
        .ok_or(GameSessionError::NotFound(id))?;

    if session.owner_id != owner_id {
        return Err(GameSessionError::Forbidden(id));
    }

    Ok(session)
}

/// Players of a session in insertion order (`created_at`, then time-ordered id).
pub(crate) async fn players_in_order<C: ConnectionTrait>(
    conn: &C,
    session_id: Uuid,
) -> Result<Vec<players::Model>, DbErr> {
    players::Entity::find()
        .filter(players::Column::GameSessionId.eq(session_id))
        .order_by_asc(players::Column::CreatedAt)
        .order_by_asc(players::Column::Id)
        .all(conn)
        .await
}

/// Stored settlements of a session in emission order.
pub(crate) async fn settlements_in_order<C: ConnectionTrait>(
    conn: &C,
    session_id: Uuid,
) -> Result<Vec<settlements::Model>, DbErr> {
    settlements::Entity::find()
        .filter(settlements::Column::GameSessionId.eq(session_id))
        .order_by_asc(settlements::Column::Position)
        .all(conn)
        .await
}

/// Game session repository.
#[derive(Debug, Clone)]
pub struct GameSessionRepository {
    db: DatabaseConnection,
}

impl GameSessionRepository {
    /// Creates a new game session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's sessions, newest game date first, with details.
    ///
    /// Returns the page of sessions and the owner's total session count.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<GameSessionWithDetails>, u64), GameSessionError> {
        let base =
            game_sessions::Entity::find().filter(game_sessions::Column::OwnerId.eq(owner_id));

        let total = base.clone().count(&self.db).await?;

        let sessions = base
            .order_by_desc(game_sessions::Column::GameDate)
            .order_by_desc(game_sessions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(sessions.len());
        for session in sessions {
            let players = players_in_order(&self.db, session.id).await?;
            let settlements = settlements_in_order(&self.db, session.id).await?;
            result.push(GameSessionWithDetails {
                session,
                players,
                settlements,
            });
        }

        Ok((result, total))
    }

    /// Creates a new game session for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateGameSessionInput,
    ) -> Result<game_sessions::Model, GameSessionError> {
        let now = Utc::now().fixed_offset();
        let session = game_sessions::ActiveModel {
            id: Set(GameSessionId::new().into_inner()),
            owner_id: Set(owner_id),
            title: Set(input.title),
            description: Set(input.description),
            game_date: Set(input.game_date),
            is_settled: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(session.insert(&self.db).await?)
    }

    /// Gets one of the owner's sessions with its players and settlements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`, or a database error.
    pub async fn get_with_details(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<GameSessionWithDetails, GameSessionError> {
        let session = find_owned(&self.db, id, owner_id, false).await?;
        let players = players_in_order(&self.db, id).await?;
        let settlements = settlements_in_order(&self.db, id).await?;

        Ok(GameSessionWithDetails {
            session,
            players,
            settlements,
        })
    }

    /// Applies a partial update to one of the owner's sessions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        input: UpdateGameSessionInput,
    ) -> Result<game_sessions::Model, GameSessionError> {
        let session = find_owned(&self.db, id, owner_id, false).await?;
        let mut active: game_sessions::ActiveModel = session.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(game_date) = input.game_date {
            active.game_date = Set(game_date);
        }
        if let Some(is_settled) = input.is_settled {
            active.is_settled = Set(is_settled);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes one of the owner's sessions with its players and settlements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`, or a database error.
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), GameSessionError> {
        let txn = self.db.begin().await?;

        find_owned(&txn, id, owner_id, true).await?;

        settlements::Entity::delete_many()
            .filter(settlements::Column::GameSessionId.eq(id))
            .exec(&txn)
            .await?;
        players::Entity::delete_many()
            .filter(players::Column::GameSessionId.eq(id))
            .exec(&txn)
            .await?;
        game_sessions::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
