//! Clubfund Core - unit accounting for a pooled investment club.
//!
//! This crate contains the fund's business logic: the unit accounting
//! engine, its typed errors, settings, and the service and repository traits
//! the storage layer implements. It is database-agnostic and performs no I/O
//! of its own.

pub mod constants;
pub mod errors;
pub mod ledger;
pub mod settings;
pub mod units;

// Re-export the engine surface
pub use units::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
