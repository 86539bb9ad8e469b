//! Property-based tests for the settlement service.
//!
//! - Conservation: transfers sum to surplus and to deficit
//! - No participant pays itself
//! - Every transfer is positive
//! - Recomputation yields identical output
//! - All-even sessions yield no transfers
//! - Uneven pot splits drain exactly
//! - Sub-cent amounts are rejected before matching

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::LedgerEntry;
use super::error::SettlementError;
use super::service::{SettlementService, compute_settlement};

/// Strategy to generate amounts in whole cents (0.00 to 5,000.00).
fn cents_amount() -> impl Strategy<Value = Decimal> {
    (0i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate participant names from a small pool so duplicates occur.
fn participant_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Ann", "Ben", "Cat", "Dan", "Eve", "Fay", "Gus", "Hal"])
        .prop_map(str::to_string)
}

/// Strategy to generate a balanced session: one extra entry absorbs the imbalance.
fn balanced_entries() -> impl Strategy<Value = Vec<LedgerEntry>> {
    prop::collection::vec((participant_name(), cents_amount(), cents_amount()), 1..12).prop_map(
        |raw| {
            let mut entries: Vec<LedgerEntry> = raw
                .into_iter()
                .map(|(name, contributed, distributed)| {
                    LedgerEntry::new(name, contributed, distributed)
                })
                .collect();
            let total_net: Decimal = entries.iter().map(LedgerEntry::net).sum();
            let balancer = if total_net > Decimal::ZERO {
                LedgerEntry::new("House", total_net, Decimal::ZERO)
            } else {
                LedgerEntry::new("House", Decimal::ZERO, total_net.abs())
            };
            entries.push(balancer);
            entries
        },
    )
}

/// Strategy to generate a pot split unevenly in whole cents.
///
/// Each loser pays its share of the pot rounded down to the cent, and the
/// first loser also covers the remainder, so shares like thirds of a cent
/// never appear.
fn split_pot_entries() -> impl Strategy<Value = Vec<LedgerEntry>> {
    (prop::collection::vec(1i64..9i64, 2..30), 1i64..100_000i64).prop_map(|(shares, pot)| {
        let total_shares: i64 = shares.iter().sum();
        let mut cents: Vec<i64> = shares.iter().map(|share| pot * share / total_shares).collect();
        let assigned: i64 = cents.iter().sum();
        cents[0] += pot - assigned;

        let mut entries: Vec<LedgerEntry> = cents
            .iter()
            .enumerate()
            .map(|(i, &paid)| {
                LedgerEntry::new(format!("P{i}"), Decimal::new(paid, 2), Decimal::ZERO)
            })
            .collect();
        entries.push(LedgerEntry::new("Winner", Decimal::ZERO, Decimal::new(pot, 2)));
        entries
    })
}

fn merged_nets(entries: &[LedgerEntry]) -> HashMap<&str, Decimal> {
    let mut nets: HashMap<&str, Decimal> = HashMap::new();
    for entry in entries {
        *nets.entry(entry.name.as_str()).or_default() += entry.net();
    }
    nets
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Transfers sum exactly to total surplus and total deficit.
    #[test]
    fn prop_conservation(entries in balanced_entries()) {
        let plan = SettlementService::plan(&entries).unwrap();

        prop_assert_eq!(plan.total_surplus, plan.total_deficit);
        prop_assert_eq!(plan.total_transferred(), plan.total_surplus);
        prop_assert_eq!(plan.residual, Decimal::ZERO);
    }

    /// Each participant pays exactly its loss and receives exactly its gain.
    #[test]
    fn prop_transfers_reconcile_each_participant(entries in balanced_entries()) {
        let transfers = compute_settlement(&entries).unwrap();
        let mut settled = merged_nets(&entries);

        for t in &transfers {
            *settled.get_mut(t.from_name.as_str()).unwrap() += t.amount;
            *settled.get_mut(t.to_name.as_str()).unwrap() -= t.amount;
        }

        for (name, remaining) in settled {
            prop_assert!(remaining.is_zero(), "{} left with {}", name, remaining);
        }
    }

    /// No transfer pays oneself.
    #[test]
    fn prop_no_self_payment(entries in balanced_entries()) {
        let transfers = compute_settlement(&entries).unwrap();
        prop_assert!(transfers.iter().all(|t| t.from_name != t.to_name));
    }

    /// Every transfer is strictly positive and whole cents.
    #[test]
    fn prop_positive_amounts(entries in balanced_entries()) {
        let transfers = compute_settlement(&entries).unwrap();
        for t in &transfers {
            prop_assert!(t.amount > Decimal::ZERO);
            prop_assert!(t.amount.normalize().scale() <= 2);
        }
    }

    /// Running twice gives the same list in the same order.
    #[test]
    fn prop_deterministic(entries in balanced_entries()) {
        let first = compute_settlement(&entries).unwrap();
        let second = compute_settlement(&entries).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Sessions where everyone breaks even need no transfers.
    #[test]
    fn prop_zero_sum_no_op(amounts in prop::collection::vec(cents_amount(), 0..10)) {
        let entries: Vec<LedgerEntry> = amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| LedgerEntry::new(format!("P{i}"), amount, amount))
            .collect();
        prop_assert!(compute_settlement(&entries).unwrap().is_empty());
    }

    /// Uneven pot splits pay the winner exactly the pot.
    #[test]
    fn prop_split_pot_conserves(entries in split_pot_entries()) {
        let plan = SettlementService::plan(&entries).unwrap();
        let pot = entries.last().map(|winner| winner.distributed).unwrap();

        prop_assert_eq!(plan.total_transferred(), pot);
        prop_assert_eq!(plan.total_transferred(), plan.total_surplus);
        prop_assert_eq!(plan.residual, Decimal::ZERO);
        prop_assert!(plan.transfers.iter().all(|t| t.to_name == "Winner"));
        prop_assert!(plan.transfers.iter().all(|t| t.amount > Decimal::ZERO));
    }

    /// Any sub-cent amount is rejected before matching.
    #[test]
    fn prop_sub_cent_amounts_rejected(
        entries in balanced_entries(),
        index in any::<prop::sample::Index>(),
        mills in 1i64..10i64,
    ) {
        let mut entries = entries;
        let target = index.index(entries.len());
        entries[target].contributed += Decimal::new(mills, 3);

        let err = SettlementService::plan(&entries).unwrap_err();
        let is_invalid_amount = matches!(err, SettlementError::InvalidAmount { .. });
        prop_assert!(is_invalid_amount);
    }
}
