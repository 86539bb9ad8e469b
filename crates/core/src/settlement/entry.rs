//! Ledger entry and entry-mode types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One participant's money movement in a session.
///
/// `name` is the settlement key: entries sharing a name are merged before
/// matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Participant name.
    pub name: String,
    /// Amount put into the game.
    pub contributed: Decimal,
    /// Amount taken out of the game.
    pub distributed: Decimal,
}

impl LedgerEntry {
    /// Creates a new ledger entry.
    #[must_use]
    pub fn new(name: impl Into<String>, contributed: Decimal, distributed: Decimal) -> Self {
        Self {
            name: name.into(),
            contributed,
            distributed,
        }
    }

    /// Net balance: positive means owed money, negative means owes money.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.distributed - self.contributed
    }
}

/// How a player's result was entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Separate buy-in and cash-out amounts.
    #[default]
    #[serde(rename = "buyin-cashout")]
    BuyinCashout,
    /// A single signed profit or loss.
    #[serde(rename = "pnl")]
    Pnl,
}

impl EntryMode {
    /// Returns the wire/storage name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BuyinCashout => "buyin-cashout",
            Self::Pnl => "pnl",
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyin-cashout" => Ok(Self::BuyinCashout),
            "pnl" => Ok(Self::Pnl),
            other => Err(format!("unknown entry mode: {other}")),
        }
    }
}

/// A player's recorded buy-in and cash-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAmounts {
    /// Amount bought in (contributed).
    pub buy_in: Decimal,
    /// Amount cashed out (distributed).
    pub cash_out: Decimal,
}

impl PlayerAmounts {
    /// Creates amounts from an explicit buy-in and cash-out.
    #[must_use]
    pub const fn new(buy_in: Decimal, cash_out: Decimal) -> Self {
        Self { buy_in, cash_out }
    }

    /// Expresses a signed profit/loss as a buy-in/cash-out pair.
    ///
    /// Winnings become a cash-out with zero buy-in, losses become a buy-in
    /// with zero cash-out.
    #[must_use]
    pub fn from_pnl(pnl: Decimal) -> Self {
        if pnl.is_sign_negative() {
            Self::new(pnl.abs(), Decimal::ZERO)
        } else {
            Self::new(Decimal::ZERO, pnl)
        }
    }

    /// Signed profit/loss (`cash_out - buy_in`).
    #[must_use]
    pub fn pnl(&self) -> Decimal {
        self.cash_out - self.buy_in
    }

    /// Converts to a ledger entry for the named player.
    #[must_use]
    pub fn to_entry(&self, name: impl Into<String>) -> LedgerEntry {
        LedgerEntry::new(name, self.buy_in, self.cash_out)
    }
}
