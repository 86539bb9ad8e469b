//! `SeaORM` active enums.

use pokerledger_core::settlement::EntryMode as CoreEntryMode;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a player's result was entered, stored as a short string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryMode {
    /// Separate buy-in and cash-out.
    #[sea_orm(string_value = "buyin-cashout")]
    #[serde(rename = "buyin-cashout")]
    BuyinCashout,
    /// Single signed profit or loss.
    #[sea_orm(string_value = "pnl")]
    #[serde(rename = "pnl")]
    Pnl,
}

impl From<CoreEntryMode> for EntryMode {
    fn from(mode: CoreEntryMode) -> Self {
        match mode {
            CoreEntryMode::BuyinCashout => Self::BuyinCashout,
            CoreEntryMode::Pnl => Self::Pnl,
        }
    }
}

impl From<EntryMode> for CoreEntryMode {
    fn from(mode: EntryMode) -> Self {
        match mode {
            EntryMode::BuyinCashout => Self::BuyinCashout,
            EntryMode::Pnl => Self::Pnl,
        }
    }
}
