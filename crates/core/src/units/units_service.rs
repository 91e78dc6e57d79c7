use async_trait::async_trait;
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::units_engine::UnitAccountingEngine;
use super::units_errors::UnitError;
use super::units_model::*;
use super::units_traits::{FundRepositoryTrait, FundServiceTrait};
use crate::errors::{Error, Result};
use crate::ledger::{replay_ledger, ImportSummary, LedgerEntry};
use crate::settings::{FundSettings, FundSettingsUpdate};

/// Service coordinating the unit accounting engine with persistence.
///
/// Every mutation runs load -> apply -> commit under one writer lock, so two
/// operations against the fund never read the same `price_before`.
pub struct FundService {
    repository: Arc<dyn FundRepositoryTrait>,
    settings: Arc<RwLock<FundSettings>>,
    write_lock: Mutex<()>,
}

impl FundService {
    /// Creates a new FundService instance
    pub fn new(repository: Arc<dyn FundRepositoryTrait>, settings: FundSettings) -> Self {
        Self {
            repository,
            settings: Arc::new(RwLock::new(settings)),
            write_lock: Mutex::new(()),
        }
    }

    fn current_settings(&self) -> Result<FundSettings> {
        self.settings
            .read()
            .map(|s| s.clone())
            .map_err(|e| Error::Unexpected(format!("Settings lock poisoned: {}", e)))
    }

    /// Builds an engine from persisted state. Fails with `InvariantViolation`
    /// when the stored positions do not add up.
    fn load_engine(&self) -> Result<UnitAccountingEngine> {
        let snapshot = self.repository.load()?;
        UnitAccountingEngine::from_snapshot(snapshot, self.current_settings()?).map_err(|e| {
            error!("Persisted fund state failed reconciliation: {}", e);
            Error::from(e)
        })
    }

    /// Runs one mutation under the writer lock and commits its result.
    async fn execute<T, F>(&self, operation: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut UnitAccountingEngine) -> std::result::Result<T, UnitError> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut engine = self.load_engine()?;

        let outcome = f(&mut engine).map_err(|e| {
            log_rejection(operation, &e);
            Error::from(e)
        })?;

        let commit = engine.drain_commit();
        debug!(
            "Committing {}: {} transaction(s), {} position(s)",
            operation,
            commit.transactions.len(),
            commit.positions.len()
        );
        self.repository.commit(commit).await?;
        Ok(outcome)
    }
}

fn log_rejection(operation: &str, err: &UnitError) {
    match err {
        UnitError::InvariantViolation(_) => error!("{} aborted: {}", operation, err),
        e if e.is_user_error() => warn!("{} rejected: {}", operation, e),
        e => warn!("{} rejected ({}): {}", operation, e.code(), e),
    }
}

#[async_trait]
impl FundServiceTrait for FundService {
    fn get_settings(&self) -> Result<FundSettings> {
        self.current_settings()
    }

    fn update_settings(&self, update: &FundSettingsUpdate) -> Result<FundSettings> {
        let mut settings = self
            .settings
            .write()
            .map_err(|e| Error::Unexpected(format!("Settings lock poisoned: {}", e)))?;
        let updated = settings.with_update(update)?;
        info!("Fund settings updated: {:?}", updated);
        *settings = updated.clone();
        Ok(updated)
    }

    fn get_unit_price(&self) -> Result<Option<Decimal>> {
        Ok(self.load_engine()?.current_unit_price())
    }

    fn get_fund_summary(&self) -> Result<FundSummary> {
        let engine = self.load_engine()?;
        let mut summary = engine.fund_summary();
        summary.transaction_count = self.repository.list_transactions(None)?.len();
        Ok(summary)
    }

    fn get_member_summary(&self, member_id: &str) -> Result<MemberSummary> {
        Ok(self.load_engine()?.member_summary(member_id)?)
    }

    fn get_member_summaries(&self) -> Result<Vec<MemberSummary>> {
        Ok(self.load_engine()?.member_summaries())
    }

    fn get_transactions(&self, member_id: Option<&str>) -> Result<Vec<Transaction>> {
        self.repository.list_transactions(member_id)
    }

    fn preview_deposit(&self, member_id: &str, cash_amount: Decimal) -> Result<DepositResult> {
        Ok(self
            .load_engine()?
            .preview_deposit(member_id, cash_amount)?)
    }

    fn preview_withdrawal(
        &self,
        member_id: &str,
        cash_amount: Decimal,
    ) -> Result<WithdrawalResult> {
        Ok(self
            .load_engine()?
            .preview_withdrawal(member_id, cash_amount)?)
    }

    fn reconcile(&self) -> Result<()> {
        self.load_engine().map(|_| ())
    }

    async fn seed_price(&self, price: Decimal) -> Result<()> {
        self.execute("seed_price", |engine| engine.seed_price(price))
            .await
    }

    async fn deposit(&self, member_id: &str, cash_amount: Decimal) -> Result<DepositResult> {
        self.execute("deposit", |engine| engine.deposit(member_id, cash_amount))
            .await
    }

    async fn withdraw(&self, member_id: &str, cash_amount: Decimal) -> Result<WithdrawalResult> {
        self.execute("withdraw", |engine| engine.withdraw(member_id, cash_amount))
            .await
    }

    async fn withdraw_all(&self, member_id: &str) -> Result<WithdrawalResult> {
        self.execute("withdraw_all", |engine| engine.withdraw_all(member_id))
            .await
    }

    async fn adjust_units(
        &self,
        member_id: &str,
        units_delta: Decimal,
    ) -> Result<AdjustmentResult> {
        self.execute("adjust_units", |engine| {
            engine.adjust_units_direct(member_id, units_delta)
        })
        .await
    }

    async fn revalue(&self, new_total_value: Decimal) -> Result<RevaluationResult> {
        self.execute("revalue", |engine| engine.revalue(new_total_value))
            .await
    }

    async fn record(&self, request: NewTransaction) -> Result<Transaction> {
        let operation = format!("record {}", request.operation.transaction_type());
        self.execute(&operation, |engine| engine.apply(request))
            .await
    }

    async fn import_ledger(&self, entries: Vec<LedgerEntry>) -> Result<ImportSummary> {
        let _guard = self.write_lock.lock().await;
        let mut engine = self.load_engine()?;

        let summary = replay_ledger(&mut engine, &entries).map_err(|e| {
            warn!("Ledger import aborted, nothing committed: {}", e);
            e
        })?;

        let commit = engine.drain_commit();
        self.repository.commit(commit).await?;
        info!(
            "Imported {} ledger entries; fund now holds {} over {} units",
            summary.entries_applied, summary.total_value, summary.total_units
        );
        Ok(summary)
    }
}
