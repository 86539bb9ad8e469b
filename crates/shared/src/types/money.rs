//! Money helpers with decimal precision and integer minor units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts travel as `rust_decimal::Decimal` and are persisted as whole
//! minor units (cents) so no backend ever sees a binary float.

use rust_decimal::prelude::*;
use thiserror::Error;

/// Number of decimal places in the currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Largest amount accepted anywhere in the system, in minor units.
pub const MAX_MINOR_UNITS: i64 = 99_999_999_999_999;

/// Errors raised when converting between decimal amounts and minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount has non-zero digits below the minor unit.
    #[error("Amount {0} has more than 2 decimal places")]
    TooPrecise(Decimal),

    /// The amount does not fit in the supported range.
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Largest accepted amount as a decimal (999,999,999,999.99).
#[must_use]
pub fn max_amount() -> Decimal {
    Decimal::new(MAX_MINOR_UNITS, MINOR_UNIT_SCALE)
}

/// Half of one minor unit (0.005), the tolerance used when comparing totals.
#[must_use]
pub fn half_minor_unit() -> Decimal {
    Decimal::new(5, MINOR_UNIT_SCALE + 1)
}

/// Rounds an amount to the minor unit using Banker's Rounding.
#[must_use]
pub fn round_to_minor_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Converts a decimal amount into whole minor units.
///
/// Trailing zeros beyond the minor unit are accepted (`1.500` is 150 cents),
/// any other sub-cent digit is rejected.
///
/// # Errors
///
/// Returns `MoneyError::TooPrecise` if the amount is not a whole number of
/// minor units, or `MoneyError::OutOfRange` if it exceeds [`max_amount`].
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.abs() > max_amount() {
        return Err(MoneyError::OutOfRange(amount));
    }

    let normalized = amount.normalize();
    if normalized.scale() > MINOR_UNIT_SCALE {
        return Err(MoneyError::TooPrecise(amount));
    }

    let mut scaled = normalized;
    scaled.rescale(MINOR_UNIT_SCALE);
    scaled
        .mantissa()
        .to_i64()
        .ok_or(MoneyError::OutOfRange(amount))
}

/// Converts whole minor units back into a decimal amount with two places.
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
