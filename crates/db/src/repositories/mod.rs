//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod game_session;
pub mod player;
pub mod settlement;
pub mod user;

pub use game_session::{
    CreateGameSessionInput, GameSessionError, GameSessionRepository, GameSessionWithDetails,
    UpdateGameSessionInput,
};
pub use player::{CreatePlayerInput, PlayerError, PlayerRepository, UpdatePlayerInput};
pub use settlement::{SettleError, SettlementRepository, ledger_entries};
pub use user::{UserError, UserRepository};
