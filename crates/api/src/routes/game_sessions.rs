//! Game session routes.
//!
//! All routes are owner-scoped: a session belonging to another user yields 403.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use pokerledger_core::settlement::{EntryMode, PlayerAmounts};
use pokerledger_db::entities::{game_sessions, players, settlements};
use pokerledger_db::repositories::{
    CreateGameSessionInput, CreatePlayerInput, GameSessionWithDetails, UpdateGameSessionInput,
};
use pokerledger_db::{GameSessionRepository, PlayerRepository, SettlementRepository};
use pokerledger_shared::types::{PageRequest, PageResponse, from_minor_units};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{ApiError, AppState, middleware::auth::AuthUser};

/// Creates the game session router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/game-sessions", get(list_sessions).post(create_session))
        .route(
            "/game-sessions/{session_id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/game-sessions/{session_id}/players", post(add_player))
        .route(
            "/game-sessions/{session_id}/calculate-settlements",
            post(calculate_settlements),
        )
        .route("/game-sessions/{session_id}/settlements", get(list_settlements))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a game session.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGameSessionRequest {
    /// Session title.
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the game was played (RFC 3339).
    pub game_date: DateTime<FixedOffset>,
}

/// Request body for updating a game session.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGameSessionRequest {
    /// New title.
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New game date.
    pub game_date: Option<DateTime<FixedOffset>>,
    /// New settled flag.
    pub is_settled: Option<bool>,
}

/// Request body for adding a player.
///
/// With `pnl` set the buy-in and cash-out are derived from it.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    /// Player name.
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    /// Buy-in amount.
    #[serde(default)]
    pub buy_in: Decimal,
    /// Cash-out amount.
    #[serde(default)]
    pub cash_out: Decimal,
    /// Entry mode; defaults to `pnl` when `pnl` is given.
    pub entry_mode: Option<EntryMode>,
    /// Signed profit or loss.
    pub pnl: Option<Decimal>,
}

impl CreatePlayerRequest {
    fn into_input(self) -> CreatePlayerInput {
        let (amounts, default_mode) = match self.pnl {
            Some(pnl) => (PlayerAmounts::from_pnl(pnl), EntryMode::Pnl),
            None => (
                PlayerAmounts::new(self.buy_in, self.cash_out),
                EntryMode::BuyinCashout,
            ),
        };

        CreatePlayerInput {
            name: self.name,
            amounts,
            entry_mode: self.entry_mode.unwrap_or(default_mode).into(),
        }
    }
}

/// A player as returned by the API.
#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    /// Player ID.
    pub id: Uuid,
    /// Owning session ID.
    pub game_session_id: Uuid,
    /// Player name.
    pub name: String,
    /// Buy-in amount.
    pub buy_in: Decimal,
    /// Cash-out amount.
    pub cash_out: Decimal,
    /// Entry mode.
    pub entry_mode: EntryMode,
    /// Cash-out minus buy-in.
    pub net_result: Decimal,
}

impl From<players::Model> for PlayerResponse {
    fn from(player: players::Model) -> Self {
        let amounts = PlayerAmounts::new(
            from_minor_units(player.buy_in_minor),
            from_minor_units(player.cash_out_minor),
        );
        Self {
            id: player.id,
            game_session_id: player.game_session_id,
            name: player.name,
            buy_in: amounts.buy_in,
            cash_out: amounts.cash_out,
            entry_mode: player.entry_mode.into(),
            net_result: amounts.pnl(),
        }
    }
}

/// A stored transfer as returned by the API.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    /// Settlement ID.
    pub id: Uuid,
    /// Owning session ID.
    pub game_session_id: Uuid,
    /// Emission order.
    pub position: i32,
    /// Paying player.
    pub from_player: String,
    /// Receiving player.
    pub to_player: String,
    /// Amount.
    pub amount: Decimal,
}

impl From<settlements::Model> for SettlementResponse {
    fn from(settlement: settlements::Model) -> Self {
        Self {
            id: settlement.id,
            game_session_id: settlement.game_session_id,
            position: settlement.position,
            from_player: settlement.from_player,
            to_player: settlement.to_player,
            amount: from_minor_units(settlement.amount_minor),
        }
    }
}

/// A game session with players and settlements.
#[derive(Debug, Serialize)]
pub struct GameSessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Owner user ID.
    pub owner_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// When the game was played.
    pub game_date: DateTime<FixedOffset>,
    /// Whether settlements have been calculated.
    pub is_settled: bool,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Updated at timestamp.
    pub updated_at: DateTime<FixedOffset>,
    /// Players in insertion order.
    pub players: Vec<PlayerResponse>,
    /// Settlements in emission order.
    pub settlements: Vec<SettlementResponse>,
}

impl GameSessionResponse {
    fn new(
        session: game_sessions::Model,
        players: Vec<players::Model>,
        settlements: Vec<settlements::Model>,
    ) -> Self {
        Self {
            id: session.id,
            owner_id: session.owner_id,
            title: session.title,
            description: session.description,
            game_date: session.game_date,
            is_settled: session.is_settled,
            created_at: session.created_at,
            updated_at: session.updated_at,
            players: players.into_iter().map(PlayerResponse::from).collect(),
            settlements: settlements.into_iter().map(SettlementResponse::from).collect(),
        }
    }
}

impl From<GameSessionWithDetails> for GameSessionResponse {
    fn from(details: GameSessionWithDetails) -> Self {
        Self::new(details.session, details.players, details.settlements)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /game-sessions - The caller's sessions, newest game first.
async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (sessions, total) = GameSessionRepository::new((*state.db).clone())
        .list_for_owner(auth.user_id(), &page)
        .await?;

    let data = sessions.into_iter().map(GameSessionResponse::from).collect();
    let per_page = u32::try_from(page.limit()).unwrap_or(page.per_page);
    Ok(Json(PageResponse::new(data, page.page.max(1), per_page, total)))
}

/// POST /game-sessions - Create a session.
async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateGameSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let session = GameSessionRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateGameSessionInput {
                title: payload.title,
                description: payload.description,
                game_date: payload.game_date,
            },
        )
        .await?;

    info!(session_id = %session.id, owner_id = %session.owner_id, "Game session created");
    Ok((
        StatusCode::CREATED,
        Json(GameSessionResponse::new(session, Vec::new(), Vec::new())),
    ))
}

/// GET /game-sessions/{session_id} - One session with details.
async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let details = GameSessionRepository::new((*state.db).clone())
        .get_with_details(session_id, auth.user_id())
        .await?;

    Ok(Json(GameSessionResponse::from(details)))
}

/// PUT /game-sessions/{session_id} - Partial update.
async fn update_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<UpdateGameSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let repo = GameSessionRepository::new((*state.db).clone());
    repo.update(
        session_id,
        auth.user_id(),
        UpdateGameSessionInput {
            title: payload.title,
            description: payload.description.map(Some),
            game_date: payload.game_date,
            is_settled: payload.is_settled,
        },
    )
    .await?;

    let details = repo.get_with_details(session_id, auth.user_id()).await?;
    Ok(Json(GameSessionResponse::from(details)))
}

/// DELETE /game-sessions/{session_id} - Delete with players and settlements.
async fn delete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    GameSessionRepository::new((*state.db).clone())
        .delete(session_id, auth.user_id())
        .await?;

    info!(session_id = %session_id, "Game session deleted");
    Ok(Json(serde_json::json!({
        "message": "Game session deleted successfully"
    })))
}

/// POST /game-sessions/{session_id}/players - Add a player.
async fn add_player(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<CreatePlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let player = PlayerRepository::new((*state.db).clone())
        .add_player(session_id, auth.user_id(), payload.into_input())
        .await?;

    Ok((StatusCode::CREATED, Json(PlayerResponse::from(player))))
}

/// POST /game-sessions/{session_id}/calculate-settlements - Recompute transfers.
async fn calculate_settlements(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = SettlementRepository::new((*state.db).clone())
        .settle_session(session_id, auth.user_id())
        .await?;

    let response: Vec<SettlementResponse> =
        stored.into_iter().map(SettlementResponse::from).collect();
    Ok(Json(response))
}

/// GET /game-sessions/{session_id}/settlements - Stored transfers in order.
async fn list_settlements(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = SettlementRepository::new((*state.db).clone())
        .list_for_session(session_id, auth.user_id())
        .await?;

    let response: Vec<SettlementResponse> =
        stored.into_iter().map(SettlementResponse::from).collect();
    Ok(Json(response))
}
