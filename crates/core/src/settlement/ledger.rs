//! Net ledger building.
//!
//! Groups ledger entries into creditors and debtors. Entries sharing a name
//! are merged first so a participant can never be matched against itself.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::entry::LedgerEntry;

/// A participant's merged net balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetBalance {
    /// Participant name.
    pub name: String,
    /// Net balance (distributed minus contributed).
    pub net: Decimal,
}

/// Creditors and debtors in matching order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetLedger {
    /// Positive nets, largest first.
    pub creditors: Vec<NetBalance>,
    /// Negative nets, most negative first.
    pub debtors: Vec<NetBalance>,
}

impl NetLedger {
    /// Builds the net ledger from entries in their original order.
    ///
    /// Entries with the same name are summed and keep the position of the
    /// first occurrence. Zero nets are dropped. Sorting is stable, so equal
    /// nets stay in input order.
    #[must_use]
    pub fn build(entries: &[LedgerEntry]) -> Self {
        let mut merged: Vec<NetBalance> = Vec::with_capacity(entries.len());
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(entries.len());

        for entry in entries {
            if let Some(&slot) = index.get(entry.name.as_str()) {
                merged[slot].net += entry.net();
            } else {
                index.insert(entry.name.as_str(), merged.len());
                merged.push(NetBalance {
                    name: entry.name.clone(),
                    net: entry.net(),
                });
            }
        }

        let (mut creditors, mut debtors): (Vec<_>, Vec<_>) = merged
            .into_iter()
            .filter(|balance| !balance.net.is_zero())
            .partition(|balance| balance.net > Decimal::ZERO);

        creditors.sort_by(|a, b| b.net.cmp(&a.net));
        debtors.sort_by(|a, b| a.net.cmp(&b.net));

        Self { creditors, debtors }
    }

    /// Sum of creditor nets.
    #[must_use]
    pub fn total_surplus(&self) -> Decimal {
        self.creditors.iter().map(|c| c.net).sum()
    }

    /// Sum of debtor net magnitudes.
    #[must_use]
    pub fn total_deficit(&self) -> Decimal {
        self.debtors.iter().map(|d| d.net.abs()).sum()
    }

    /// Returns true if nobody owes or is owed anything.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.creditors.is_empty() && self.debtors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn names(balances: &[NetBalance]) -> Vec<&str> {
        balances.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_groups_and_sorts() {
        let entries = vec![
            LedgerEntry::new("C", dec!(40), dec!(0)),
            LedgerEntry::new("B", dec!(0), dec!(30)),
            LedgerEntry::new("D", dec!(60), dec!(0)),
            LedgerEntry::new("A", dec!(0), dec!(70)),
        ];
        let ledger = NetLedger::build(&entries);

        assert_eq!(names(&ledger.creditors), vec!["A", "B"]);
        assert_eq!(names(&ledger.debtors), vec!["D", "C"]);
        assert_eq!(ledger.total_surplus(), dec!(100));
        assert_eq!(ledger.total_deficit(), dec!(100));
    }

    #[test]
    fn test_zero_nets_dropped() {
        let entries = vec![
            LedgerEntry::new("A", dec!(0), dec!(60)),
            LedgerEntry::new("B", dec!(0), dec!(0)),
            LedgerEntry::new("C", dec!(60), dec!(0)),
            LedgerEntry::new("E", dec!(25), dec!(25)),
        ];
        let ledger = NetLedger::build(&entries);

        assert_eq!(names(&ledger.creditors), vec!["A"]);
        assert_eq!(names(&ledger.debtors), vec!["C"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let entries = vec![
            LedgerEntry::new("X", dec!(0), dec!(10)),
            LedgerEntry::new("Y", dec!(10), dec!(0)),
            LedgerEntry::new("Z", dec!(0), dec!(10)),
            LedgerEntry::new("W", dec!(10), dec!(0)),
        ];
        let ledger = NetLedger::build(&entries);

        assert_eq!(names(&ledger.creditors), vec!["X", "Z"]);
        assert_eq!(names(&ledger.debtors), vec!["Y", "W"]);
    }

    #[test]
    fn test_duplicate_names_are_merged() {
        let entries = vec![
            LedgerEntry::new("A", dec!(50), dec!(0)),
            LedgerEntry::new("B", dec!(0), dec!(20)),
            LedgerEntry::new("A", dec!(0), dec!(80)),
            LedgerEntry::new("C", dec!(50), dec!(0)),
        ];
        let ledger = NetLedger::build(&entries);

        assert_eq!(
            ledger.creditors,
            vec![
                NetBalance {
                    name: "A".to_string(),
                    net: dec!(30),
                },
                NetBalance {
                    name: "B".to_string(),
                    net: dec!(20),
                },
            ]
        );
        assert_eq!(names(&ledger.debtors), vec!["C"]);
    }

    #[test]
    fn test_merge_to_zero_is_dropped() {
        let entries = vec![
            LedgerEntry::new("A", dec!(50), dec!(0)),
            LedgerEntry::new("A", dec!(0), dec!(50)),
        ];
        assert!(NetLedger::build(&entries).is_settled());
    }

    #[test]
    fn test_empty_input() {
        let ledger = NetLedger::build(&[]);
        assert!(ledger.is_settled());
        assert_eq!(ledger.total_surplus(), Decimal::ZERO);
    }
}
