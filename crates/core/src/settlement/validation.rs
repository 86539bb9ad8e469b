//! Amount and balance validation.
//!
//! Runs before the net ledger is built; a failure aborts the settlement
//! without emitting any transfer.

use pokerledger_shared::types::money::{half_minor_unit, to_minor_units};
use rust_decimal::Decimal;

use super::entry::LedgerEntry;
use super::error::{AmountField, SettlementError};

/// Validates a single amount.
///
/// The amount must be non-negative, within the supported range and a whole
/// number of minor units, so every net and every matched amount is exact.
///
/// # Errors
///
/// Returns `SettlementError::InvalidAmount` naming the participant and field.
pub fn validate_amount(
    name: &str,
    field: AmountField,
    amount: Decimal,
) -> Result<(), SettlementError> {
    if amount < Decimal::ZERO || to_minor_units(amount).is_err() {
        return Err(SettlementError::InvalidAmount {
            name: name.to_string(),
            field,
            amount,
        });
    }
    Ok(())
}

/// Validates every entry's contributed and distributed amounts.
///
/// # Errors
///
/// Returns the first `SettlementError::InvalidAmount` found, in entry order.
pub fn validate_entries(entries: &[LedgerEntry]) -> Result<(), SettlementError> {
    for entry in entries {
        validate_amount(&entry.name, AmountField::Contributed, entry.contributed)?;
        validate_amount(&entry.name, AmountField::Distributed, entry.distributed)?;
    }
    Ok(())
}

/// Checks that surplus and deficit agree within half a minor unit.
///
/// # Errors
///
/// Returns `SettlementError::UnbalancedLedger` carrying both totals.
pub fn check_balance(surplus: Decimal, deficit: Decimal) -> Result<(), SettlementError> {
    if (surplus - deficit).abs() > half_minor_unit() {
        return Err(SettlementError::UnbalancedLedger { surplus, deficit });
    }
    Ok(())
}
