//! Fund repository and service traits.
//!
//! These traits define the contract for fund persistence and the operations
//! exposed to dashboards and admin tools, without any storage-specific types.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::units_model::*;
use crate::errors::Result;
use crate::ledger::{ImportSummary, LedgerEntry};
use crate::settings::{FundSettings, FundSettingsUpdate};

/// Trait defining the contract for fund persistence.
///
/// A successful `commit` must persist the fund state, the touched positions
/// and the new transactions together, or none of them.
#[async_trait]
pub trait FundRepositoryTrait: Send + Sync {
    /// Loads the current fund state and every member position.
    fn load(&self) -> Result<FundSnapshot>;

    /// Atomically persists the outcome of one or more engine operations.
    async fn commit(&self, commit: FundCommit) -> Result<()>;

    /// Lists committed transactions, oldest first, optionally for one member.
    fn list_transactions(&self, member_id: Option<&str>) -> Result<Vec<Transaction>>;
}

/// Trait defining the contract for fund service operations.
///
/// Mutating calls against one fund are serialized by the implementation.
#[async_trait]
pub trait FundServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<FundSettings>;

    fn update_settings(&self, update: &FundSettingsUpdate) -> Result<FundSettings>;

    /// Current unit price; `None` while the fund is not capitalized.
    fn get_unit_price(&self) -> Result<Option<Decimal>>;

    fn get_fund_summary(&self) -> Result<FundSummary>;

    fn get_member_summary(&self, member_id: &str) -> Result<MemberSummary>;

    fn get_member_summaries(&self) -> Result<Vec<MemberSummary>>;

    fn get_transactions(&self, member_id: Option<&str>) -> Result<Vec<Transaction>>;

    /// Units a deposit would issue at the current price.
    fn preview_deposit(&self, member_id: &str, cash_amount: Decimal) -> Result<DepositResult>;

    /// Units a withdrawal would remove at the current price.
    fn preview_withdrawal(
        &self,
        member_id: &str,
        cash_amount: Decimal,
    ) -> Result<WithdrawalResult>;

    /// Runs the invariant checks against persisted state.
    fn reconcile(&self) -> Result<()>;

    async fn seed_price(&self, price: Decimal) -> Result<()>;

    async fn deposit(&self, member_id: &str, cash_amount: Decimal) -> Result<DepositResult>;

    async fn withdraw(&self, member_id: &str, cash_amount: Decimal) -> Result<WithdrawalResult>;

    async fn withdraw_all(&self, member_id: &str) -> Result<WithdrawalResult>;

    async fn adjust_units(&self, member_id: &str, units_delta: Decimal)
        -> Result<AdjustmentResult>;

    async fn revalue(&self, new_total_value: Decimal) -> Result<RevaluationResult>;

    /// Applies an operation with an explicit timestamp and notes.
    async fn record(&self, request: NewTransaction) -> Result<Transaction>;

    /// Replays historical ledger rows through the engine and commits them
    /// together. Nothing is committed if any row fails.
    async fn import_ledger(&self, entries: Vec<LedgerEntry>) -> Result<ImportSummary>;
}
