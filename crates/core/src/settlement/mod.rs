//! Session settlement.
//!
//! This module turns each player's buy-in and cash-out into the list of
//! peer-to-peer transfers that brings every balance back to zero:
//! - Ledger entries and entry modes
//! - Net ledger building (merge by name, creditor/debtor grouping)
//! - Greedy transfer matching over an index arena
//! - Amount and balance validation
//! - Settlement service producing the final plan

pub mod entry;
pub mod error;
pub mod ledger;
pub mod matcher;
pub mod service;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use entry::{EntryMode, LedgerEntry, PlayerAmounts};
pub use error::{AmountField, SettlementError};
pub use ledger::{NetBalance, NetLedger};
pub use matcher::{MatchOutcome, NetPosition, Transfer, match_transfers};
pub use service::{SettlementPlan, SettlementService, compute_settlement};
pub use validation::{check_balance, validate_amount, validate_entries};
