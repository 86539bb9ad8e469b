//! `SeaORM` entity prelude.

pub use super::game_sessions::Entity as GameSessions;
pub use super::players::Entity as Players;
pub use super::settlements::Entity as Settlements;
pub use super::users::Entity as Users;
