//! Player routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
};
use pokerledger_core::settlement::{EntryMode, PlayerAmounts};
use pokerledger_db::PlayerRepository;
use pokerledger_db::repositories::UpdatePlayerInput;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::game_sessions::PlayerResponse;
use crate::{ApiError, AppState, middleware::auth::AuthUser};

/// Creates the player router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/players/unique-names", get(unique_names))
        .route("/players/{player_id}", put(update_player).delete(delete_player))
}

/// Request body for updating a player.
///
/// A `pnl` value replaces both amounts and switches the entry mode to `pnl`
/// unless one is given explicitly.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlayerRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New buy-in amount.
    pub buy_in: Option<Decimal>,
    /// New cash-out amount.
    pub cash_out: Option<Decimal>,
    /// New entry mode.
    pub entry_mode: Option<EntryMode>,
    /// Signed profit or loss.
    pub pnl: Option<Decimal>,
}

impl UpdatePlayerRequest {
    fn into_input(self) -> UpdatePlayerInput {
        match self.pnl {
            Some(pnl) => {
                let amounts = PlayerAmounts::from_pnl(pnl);
                UpdatePlayerInput {
                    name: self.name,
                    buy_in: Some(amounts.buy_in),
                    cash_out: Some(amounts.cash_out),
                    entry_mode: Some(self.entry_mode.unwrap_or(EntryMode::Pnl).into()),
                }
            }
            None => UpdatePlayerInput {
                name: self.name,
                buy_in: self.buy_in,
                cash_out: self.cash_out,
                entry_mode: self.entry_mode.map(Into::into),
            },
        }
    }
}

/// PUT /players/{player_id} - Partial update.
async fn update_player(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(player_id): Path<Uuid>,
    Json(payload): Json<UpdatePlayerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let player = PlayerRepository::new((*state.db).clone())
        .update_player(player_id, auth.user_id(), payload.into_input())
        .await?;

    Ok(Json(PlayerResponse::from(player)))
}

/// DELETE /players/{player_id} - Remove a player from its session.
async fn delete_player(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(player_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    PlayerRepository::new((*state.db).clone())
        .delete_player(player_id, auth.user_id())
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Player deleted successfully"
    })))
}

/// GET /players/unique-names - Names used across the caller's sessions.
async fn unique_names(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let names = PlayerRepository::new((*state.db).clone())
        .unique_names(auth.user_id())
        .await?;

    Ok(Json(names))
}
