//! Ledger module - historical backfill routed through the engine.

mod ledger_model;
mod ledger_replay;

pub use ledger_model::{ImportSummary, LedgerEntry};
pub use ledger_replay::replay_ledger;

#[cfg(test)]
mod ledger_replay_tests;
