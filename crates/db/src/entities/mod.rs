//! `SeaORM` entity definitions.

pub mod prelude;

pub mod game_sessions;
pub mod players;
pub mod sea_orm_active_enums;
pub mod settlements;
pub mod users;
