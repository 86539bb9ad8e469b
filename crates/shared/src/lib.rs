//! Shared types, errors, and configuration for Poker Ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers for minor-unit (cent) arithmetic
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, LoginRequest, RegisterRequest, TokenResponse, UserInfo};
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
