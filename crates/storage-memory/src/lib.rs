//! In-process storage implementation for the club fund.
//!
//! This crate implements the repository traits defined in `clubfund-core`
//! on top of a single lock-protected store. Every commit lands under one
//! write lock, so readers never observe a fund whose positions and totals
//! disagree.
//!
//! ```text
//! core (domain)
//!       │
//!       ▼
//! storage-memory (this crate)
//!       │
//!       ▼
//!   RwLock<FundStore>
//! ```

pub mod errors;
pub mod fund;

pub use errors::StorageError;
pub use fund::InMemoryFundRepository;

// Re-export from clubfund-core for convenience
pub use clubfund_core::errors::{DatabaseError, Error, Result};
