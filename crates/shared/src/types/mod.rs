//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{MoneyError, from_minor_units, half_minor_unit, round_to_minor_unit, to_minor_units};
pub use pagination::{PageRequest, PageResponse};
