//! Core business logic for Poker Ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All settlement types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `settlement` - Net ledger building and greedy transfer matching
//! - `auth` - Password hashing

pub mod auth;
pub mod settlement;

pub use settlement::{
    SettlementError, SettlementPlan, SettlementService, Transfer, compute_settlement,
};
