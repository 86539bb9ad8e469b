//! Settlement service.
//!
//! Validates entries, builds the net ledger, checks it balances, and runs the
//! matcher. Pure and synchronous; callers own any persistence.

use rust_decimal::Decimal;
use serde::Serialize;

use super::entry::LedgerEntry;
use super::error::SettlementError;
use super::ledger::NetLedger;
use super::matcher::{Transfer, match_transfers};
use super::validation::{check_balance, validate_entries};

/// Full result of a settlement computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementPlan {
    /// Transfers in emission order.
    pub transfers: Vec<Transfer>,
    /// Sum of positive nets.
    pub total_surplus: Decimal,
    /// Sum of negative net magnitudes.
    pub total_deficit: Decimal,
    /// Unrounded balance left after matching.
    pub residual: Decimal,
}

impl SettlementPlan {
    /// Sum of emitted transfer amounts.
    #[must_use]
    pub fn total_transferred(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Settlement service with no I/O.
pub struct SettlementService;

impl SettlementService {
    /// Computes the settlement plan for a session's entries.
    ///
    /// 1. Validates every amount
    /// 2. Builds the net ledger (merge by name, group, stable sort)
    /// 3. Rejects ledgers whose surplus and deficit disagree beyond half a cent
    /// 4. Matches debtors to creditors greedily
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::InvalidAmount` or
    /// `SettlementError::UnbalancedLedger`; nothing is emitted in either case.
    pub fn plan(entries: &[LedgerEntry]) -> Result<SettlementPlan, SettlementError> {
        validate_entries(entries)?;

        let ledger = NetLedger::build(entries);
        let total_surplus = ledger.total_surplus();
        let total_deficit = ledger.total_deficit();
        check_balance(total_surplus, total_deficit)?;

        let outcome = match_transfers(&ledger);

        Ok(SettlementPlan {
            transfers: outcome.transfers,
            total_surplus,
            total_deficit,
            residual: outcome.residual,
        })
    }
}

/// Computes the ordered transfer list for a session's entries.
///
/// # Errors
///
/// See [`SettlementService::plan`].
pub fn compute_settlement(entries: &[LedgerEntry]) -> Result<Vec<Transfer>, SettlementError> {
    SettlementService::plan(entries).map(|plan| plan.transfers)
}
