//! Replays historical ledger rows through the unit accounting engine.
//!
//! Bulk imports go through the same validation as live transactions instead
//! of writing balances directly, so an imported ledger cannot break the
//! units-sum invariant.

use log::{debug, info};

use super::ledger_model::{ImportSummary, LedgerEntry};
use crate::errors::{Error, Result, ValidationError};
use crate::units::{TransactionType, UnitAccountingEngine};

/// Applies `entries` in order on a staged copy of `engine`.
///
/// The first failing row aborts the import with `Error::Import` naming its
/// index, and `engine` is left as it was. On success the staged state replaces
/// `engine` (its pending transactions include the replayed rows) after a
/// final reconciliation.
pub fn replay_ledger(
    engine: &mut UnitAccountingEngine,
    entries: &[LedgerEntry],
) -> Result<ImportSummary> {
    let mut staged = engine.clone();
    let mut summary = ImportSummary::default();
    let mut last_timestamp = None;

    for (index, entry) in entries.iter().enumerate() {
        if let Some(previous) = last_timestamp {
            if entry.timestamp < previous {
                return Err(import_error(
                    index,
                    Error::Validation(ValidationError::InvalidInput(format!(
                        "entry dated {} is earlier than the previous entry ({})",
                        entry.timestamp, previous
                    ))),
                ));
            }
        }
        last_timestamp = Some(entry.timestamp);

        let request = entry
            .to_new_transaction()
            .map_err(|e| import_error(index, e))?;
        debug!(
            "Replaying ledger entry {} ({}) for member {:?} dated {}",
            index,
            request.operation.transaction_type(),
            request.operation.member_id(),
            entry.timestamp
        );
        staged
            .apply(request)
            .map_err(|e| import_error(index, e.into()))?;

        match entry.entry_type {
            TransactionType::Deposit => summary.deposits += 1,
            TransactionType::Withdrawal => summary.withdrawals += 1,
            TransactionType::UnitAdjustment => summary.adjustments += 1,
            TransactionType::Revaluation => summary.revaluations += 1,
            TransactionType::SeedPrice => {}
        }
        summary.entries_applied += 1;
    }

    staged.reconcile()?;

    let fund = staged.fund_state();
    summary.total_value = fund.total_value;
    summary.total_units = fund.total_units;
    summary.unit_price = staged.current_unit_price();
    info!(
        "Ledger replay applied {} entries ({} deposits, {} withdrawals)",
        summary.entries_applied, summary.deposits, summary.withdrawals
    );

    *engine = staged;
    Ok(summary)
}

fn import_error(index: usize, source: Error) -> Error {
    Error::Import {
        index,
        source: Box::new(source),
    }
}
