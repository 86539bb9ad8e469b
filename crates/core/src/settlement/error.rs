//! Settlement error types.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

/// Which side of a ledger entry an amount belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountField {
    /// Amount put in (buy-in).
    Contributed,
    /// Amount taken out (cash-out).
    Distributed,
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contributed => f.write_str("contributed"),
            Self::Distributed => f.write_str("distributed"),
        }
    }
}

/// Errors that can occur while computing a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// A contributed or distributed amount is negative or out of range.
    #[error("Invalid {field} amount {amount} for '{name}'")]
    InvalidAmount {
        /// Participant the amount belongs to.
        name: String,
        /// Which amount is invalid.
        field: AmountField,
        /// The rejected value.
        amount: Decimal,
    },

    /// Creditor surplus and debtor deficit disagree beyond rounding tolerance.
    #[error("Ledger is unbalanced. Surplus: {surplus}, Deficit: {deficit}")]
    UnbalancedLedger {
        /// Sum of positive nets.
        surplus: Decimal,
        /// Sum of the magnitudes of negative nets.
        deficit: Decimal,
    },
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::UnbalancedLedger { .. } => "UNBALANCED_LEDGER",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } => 400,
            Self::UnbalancedLedger { .. } => 422,
        }
    }
}
