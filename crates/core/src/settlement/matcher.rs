//! Greedy settlement matching.
//!
//! Debtors are drained in order into creditors in order. Working balances
//! live in two index-addressed arenas owned by a single call, and are never
//! shared with the caller's net ledger.

use pokerledger_shared::types::money::round_to_minor_unit;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger::{NetBalance, NetLedger};

/// Working copy of a participant's outstanding balance during matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetPosition {
    /// Participant name.
    pub name: String,
    /// Unrounded amount still to pay or receive.
    pub remaining: Decimal,
}

impl NetPosition {
    fn from_balance(balance: &NetBalance) -> Self {
        Self {
            name: balance.name.clone(),
            remaining: balance.net.abs(),
        }
    }

    fn is_drained(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// A single payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Paying participant.
    pub from_name: String,
    /// Receiving participant.
    pub to_name: String,
    /// Amount rounded to the minor unit, always positive.
    pub amount: Decimal,
}

/// Result of a matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Transfers in emission order.
    pub transfers: Vec<Transfer>,
    /// Unrounded balance left undrained on both sides.
    pub residual: Decimal,
}

/// Matches debtors against creditors.
///
/// For each debtor the first creditor with a balance receives
/// `min(debtor, creditor)`; both balances drop by that unrounded amount and
/// the rounded amount is emitted. Creditors are drained strictly in order,
/// so a single cursor tracks the first creditor still owed money. Amounts
/// that round to zero are not emitted.
#[must_use]
pub fn match_transfers(ledger: &NetLedger) -> MatchOutcome {
    let mut creditors: Vec<NetPosition> = ledger
        .creditors
        .iter()
        .map(NetPosition::from_balance)
        .collect();
    let mut debtors: Vec<NetPosition> = ledger
        .debtors
        .iter()
        .map(NetPosition::from_balance)
        .collect();

    let mut transfers = Vec::new();
    let mut cursor = 0;

    for d in 0..debtors.len() {
        while !debtors[d].is_drained() && cursor < creditors.len() {
            if creditors[cursor].is_drained() {
                cursor += 1;
                continue;
            }

            let amount = debtors[d].remaining.min(creditors[cursor].remaining);
            debtors[d].remaining -= amount;
            creditors[cursor].remaining -= amount;

            let rounded = round_to_minor_unit(amount);
            if rounded > Decimal::ZERO {
                transfers.push(Transfer {
                    from_name: debtors[d].name.clone(),
                    to_name: creditors[cursor].name.clone(),
                    amount: rounded,
                });
            }
        }
    }

    let residual: Decimal = creditors
        .iter()
        .chain(debtors.iter())
        .map(|position| position.remaining)
        .sum();

    MatchOutcome { transfers, residual }
}
