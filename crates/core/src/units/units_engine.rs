//! Unit accounting engine.
//!
//! Deposits, withdrawals and direct unit adjustments move value and units at
//! the price in force immediately before the transaction, so only a seed or a
//! revaluation can change the price and no member is diluted. Each operation
//! is planned against the current state, verified, and only then applied, so
//! a rejected operation leaves the engine untouched.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use log::{debug, error, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use super::units_errors::UnitError;
use super::units_model::*;
use crate::settings::FundSettings;

type UnitResult<T> = std::result::Result<T, UnitError>;

/// Fully computed effect of an operation, not yet applied.
#[derive(Debug, Clone)]
struct PlannedChange {
    transaction_type: TransactionType,
    fund: FundState,
    position: Option<MemberPosition>,
    cash_amount: Option<Decimal>,
    units_delta: Decimal,
    price_before: Option<Decimal>,
    preserves_price: bool,
    /// Percentage move of the unit price, set for revaluations.
    pct_change: Option<Decimal>,
}

impl PlannedChange {
    fn price_after(&self) -> Decimal {
        self.fund
            .unit_price()
            .or(self.price_before)
            .unwrap_or(Decimal::ZERO)
    }
}

/// In-memory unit accounting for a single fund.
///
/// The engine performs no I/O and is not synchronized; callers serialize
/// mutating calls per fund (see `FundService`).
#[derive(Debug, Clone)]
pub struct UnitAccountingEngine {
    settings: FundSettings,
    fund: FundState,
    positions: BTreeMap<String, MemberPosition>,
    transactions: Vec<Transaction>,
}

impl Default for UnitAccountingEngine {
    fn default() -> Self {
        Self::new(FundSettings::default())
    }
}

impl UnitAccountingEngine {
    /// Creates an empty, uncapitalized fund.
    pub fn new(settings: FundSettings) -> Self {
        Self {
            settings,
            fund: FundState::default(),
            positions: BTreeMap::new(),
            transactions: Vec::new(),
        }
    }

    /// Builds an engine from persisted state, rejecting inconsistent snapshots.
    pub fn from_snapshot(snapshot: FundSnapshot, settings: FundSettings) -> UnitResult<Self> {
        let mut positions = BTreeMap::new();
        for position in snapshot.positions {
            let member_id = position.member_id.clone();
            if positions.insert(member_id.clone(), position).is_some() {
                return Err(UnitError::invariant(format!(
                    "duplicate position for member {}",
                    member_id
                )));
            }
        }
        let mut fund = snapshot.fund;
        if fund.reference_price.is_none() {
            fund.reference_price = fund.implied_unit_price();
        }
        let engine = Self {
            settings,
            fund,
            positions,
            transactions: Vec::new(),
        };
        engine.reconcile()?;
        Ok(engine)
    }

    pub fn settings(&self) -> &FundSettings {
        &self.settings
    }

    pub fn fund_state(&self) -> &FundState {
        &self.fund
    }

    pub fn position(&self, member_id: &str) -> Option<&MemberPosition> {
        self.positions.get(member_id)
    }

    pub fn positions(&self) -> impl Iterator<Item = &MemberPosition> {
        self.positions.values()
    }

    /// Transactions applied since the engine was built, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn snapshot(&self) -> FundSnapshot {
        FundSnapshot {
            fund: self.fund.clone(),
            positions: self.positions.values().cloned().collect(),
        }
    }

    /// Current unit price. `None` means the fund is not yet capitalized.
    pub fn current_unit_price(&self) -> Option<Decimal> {
        self.fund.unit_price()
    }

    // --- Mutating operations ---

    pub fn deposit(&mut self, member_id: &str, cash_amount: Decimal) -> UnitResult<DepositResult> {
        let tx = self.apply(
            UnitOperation::Deposit {
                member_id: member_id.to_string(),
                cash_amount,
            }
            .into(),
        )?;
        Ok(DepositResult {
            units_issued: tx.units_delta,
            new_unit_price: self.price_or_zero(),
        })
    }

    pub fn withdraw(
        &mut self,
        member_id: &str,
        cash_amount: Decimal,
    ) -> UnitResult<WithdrawalResult> {
        let tx = self.apply(
            UnitOperation::Withdrawal {
                member_id: member_id.to_string(),
                cash_amount,
            }
            .into(),
        )?;
        Ok(self.withdrawal_result(&tx))
    }

    /// Redeems every unit the member holds, closing the position.
    pub fn withdraw_all(&mut self, member_id: &str) -> UnitResult<WithdrawalResult> {
        let tx = self.apply(
            UnitOperation::WithdrawAll {
                member_id: member_id.to_string(),
            }
            .into(),
        )?;
        Ok(self.withdrawal_result(&tx))
    }

    /// Grants or removes units at the current price, moving the matching
    /// cash equivalent in or out of the fund.
    pub fn adjust_units_direct(
        &mut self,
        member_id: &str,
        units_delta: Decimal,
    ) -> UnitResult<AdjustmentResult> {
        let tx = self.apply(
            UnitOperation::UnitAdjustment {
                member_id: member_id.to_string(),
                units_delta,
            }
            .into(),
        )?;
        Ok(AdjustmentResult {
            cash_equivalent: tx.cash_amount.unwrap_or(Decimal::ZERO),
            new_unit_price: self.price_or_zero(),
        })
    }

    /// Sets the fund's total value after an external revaluation. The only
    /// operation that moves the unit price.
    pub fn revalue(&mut self, new_total_value: Decimal) -> UnitResult<RevaluationResult> {
        let plan = self.plan_revaluation(new_total_value)?;
        let pct_change = plan.pct_change;
        let request = NewTransaction::from(UnitOperation::Revaluation { new_total_value });
        let tx = self.apply_plan(plan, request)?;
        Ok(RevaluationResult {
            old_price: tx.unit_price_at_transaction.unwrap_or(Decimal::ZERO),
            new_price: self.price_or_zero(),
            pct_change,
        })
    }

    /// Establishes the price used to issue the first units.
    pub fn seed_price(&mut self, price: Decimal) -> UnitResult<()> {
        self.apply(UnitOperation::SeedPrice { price }.into())?;
        Ok(())
    }

    /// Validates, applies and records one operation.
    pub fn apply(&mut self, request: NewTransaction) -> UnitResult<Transaction> {
        let plan = self.plan(&request.operation)?;
        self.apply_plan(plan, request)
    }

    fn apply_plan(
        &mut self,
        plan: PlannedChange,
        request: NewTransaction,
    ) -> UnitResult<Transaction> {
        self.verify(&plan)?;

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            transaction_type: plan.transaction_type,
            timestamp: request.timestamp.unwrap_or_else(Utc::now),
            member_id: plan.position.as_ref().map(|p| p.member_id.clone()),
            cash_amount: plan.cash_amount,
            units_delta: plan.units_delta,
            unit_price_at_transaction: plan.price_before,
            total_value_after: plan.fund.total_value,
            total_units_after: plan.fund.total_units,
            notes: request.notes,
        };

        match transaction.transaction_type {
            TransactionType::Revaluation | TransactionType::SeedPrice => info!(
                "Applied {}: price {:?} -> {}, total value {}",
                transaction.transaction_type,
                plan.price_before,
                plan.price_after(),
                plan.fund.total_value
            ),
            _ => debug!(
                "Applied {} for member {:?}: cash {:?}, units {}, price {:?}",
                transaction.transaction_type,
                transaction.member_id,
                transaction.cash_amount,
                transaction.units_delta,
                plan.price_before
            ),
        }

        self.fund = plan.fund;
        if let Some(position) = plan.position {
            self.positions.insert(position.member_id.clone(), position);
        }
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Removes the applied transactions and pairs them with the fund state and
    /// the positions they touched, ready to be persisted in one write.
    pub fn drain_commit(&mut self) -> FundCommit {
        let transactions = std::mem::take(&mut self.transactions);
        let touched: BTreeSet<&str> = transactions
            .iter()
            .filter_map(|tx| tx.member_id.as_deref())
            .collect();
        let positions = touched
            .into_iter()
            .filter_map(|member_id| self.positions.get(member_id).cloned())
            .collect();
        FundCommit {
            fund: self.fund.clone(),
            positions,
            transactions,
        }
    }

    // --- Read-only calculators ---

    /// Units a deposit would issue, without applying it.
    pub fn preview_deposit(
        &self,
        member_id: &str,
        cash_amount: Decimal,
    ) -> UnitResult<DepositResult> {
        let plan = self.plan(&UnitOperation::Deposit {
            member_id: member_id.to_string(),
            cash_amount,
        })?;
        Ok(DepositResult {
            units_issued: plan.units_delta,
            new_unit_price: plan.price_after(),
        })
    }

    /// Units a withdrawal would remove, without applying it.
    pub fn preview_withdrawal(
        &self,
        member_id: &str,
        cash_amount: Decimal,
    ) -> UnitResult<WithdrawalResult> {
        let plan = self.plan(&UnitOperation::Withdrawal {
            member_id: member_id.to_string(),
            cash_amount,
        })?;
        Ok(WithdrawalResult {
            units_removed: -plan.units_delta,
            cash_paid: -plan.cash_amount.unwrap_or(Decimal::ZERO),
            new_unit_price: plan.price_after(),
        })
    }

    pub fn member_summary(&self, member_id: &str) -> UnitResult<MemberSummary> {
        self.positions
            .get(member_id)
            .map(|position| self.summarize(position))
            .ok_or_else(|| UnitError::UnknownMember(member_id.to_string()))
    }

    /// Summaries for every member, ordered by member id.
    pub fn member_summaries(&self) -> Vec<MemberSummary> {
        self.positions.values().map(|p| self.summarize(p)).collect()
    }

    pub fn fund_summary(&self) -> FundSummary {
        FundSummary {
            total_value: self.fund.total_value,
            total_units: self.fund.total_units,
            unit_price: self.current_unit_price(),
            member_count: self.positions.values().filter(|p| !p.is_closed()).count(),
            transaction_count: self.transactions.len(),
            base_currency: self.settings.base_currency.clone(),
        }
    }

    /// Checks the fund invariants against the current state.
    pub fn reconcile(&self) -> UnitResult<()> {
        check_fund_state(&self.fund)?;
        let mut units_sum = Decimal::ZERO;
        for position in self.positions.values() {
            check_position(position)?;
            units_sum += position.units_owned;
        }
        check_units_sum(units_sum, &self.fund)?;

        if let (Some(price), Some(implied)) =
            (self.fund.reference_price, self.fund.implied_unit_price())
        {
            if price > Decimal::ZERO
                && (implied - price).abs() / price > self.settings.price_tolerance
            {
                warn!(
                    "Implied unit price {} has drifted from reference price {}",
                    implied, price
                );
            }
        }
        Ok(())
    }

    // --- Planning ---

    fn plan(&self, operation: &UnitOperation) -> UnitResult<PlannedChange> {
        match operation {
            UnitOperation::Deposit {
                member_id,
                cash_amount,
            } => self.plan_deposit(member_id, *cash_amount),
            UnitOperation::Withdrawal {
                member_id,
                cash_amount,
            } => self.plan_withdrawal(member_id, *cash_amount),
            UnitOperation::WithdrawAll { member_id } => self.plan_withdraw_all(member_id),
            UnitOperation::UnitAdjustment {
                member_id,
                units_delta,
            } => self.plan_adjustment(member_id, *units_delta),
            UnitOperation::Revaluation { new_total_value } => {
                self.plan_revaluation(*new_total_value)
            }
            UnitOperation::SeedPrice { price } => self.plan_seed_price(*price),
        }
    }

    fn plan_deposit(&self, member_id: &str, cash: Decimal) -> UnitResult<PlannedChange> {
        if cash <= Decimal::ZERO {
            return Err(UnitError::invalid_amount("cashAmount", cash));
        }
        let price = self.require_positive_price()?;
        let units = self.units_for_cash(cash, price)?;

        let mut position = self.position_or_new(member_id);
        position.units_owned = checked_add(position.units_owned, units, "cashAmount")?;
        position.total_contributed = checked_add(position.total_contributed, cash, "cashAmount")?;

        let fund = FundState {
            total_value: checked_add(self.fund.total_value, cash, "cashAmount")?,
            total_units: checked_add(self.fund.total_units, units, "cashAmount")?,
            reference_price: self.fund.reference_price,
        };

        Ok(PlannedChange {
            transaction_type: TransactionType::Deposit,
            fund,
            position: Some(position),
            cash_amount: Some(cash),
            units_delta: units,
            price_before: Some(price),
            preserves_price: true,
            pct_change: None,
        })
    }

    fn plan_withdrawal(&self, member_id: &str, cash: Decimal) -> UnitResult<PlannedChange> {
        if cash <= Decimal::ZERO {
            return Err(UnitError::invalid_amount("cashAmount", cash));
        }
        let current = self
            .positions
            .get(member_id)
            .ok_or_else(|| UnitError::UnknownMember(member_id.to_string()))?;
        if cash > self.fund.total_value {
            return Err(UnitError::InsufficientFundValue {
                requested: cash,
                available: self.fund.total_value,
            });
        }
        let price = self.require_positive_price()?;
        let units = self.units_for_cash(cash, price)?;
        if units > current.units_owned {
            return Err(UnitError::insufficient_units(
                member_id,
                units,
                current.units_owned,
            ));
        }
        if units > self.fund.total_units {
            return Err(UnitError::insufficient_units(
                member_id,
                units,
                self.fund.total_units,
            ));
        }

        let total_units = self.fund.total_units - units;
        let total_value = self.fund.total_value - cash;
        if total_units.is_zero() && !total_value.is_zero() {
            return Err(UnitError::NotAllowed(format!(
                "withdrawal would leave {} in the fund with no units outstanding; close the last position with a full withdrawal",
                total_value
            )));
        }

        let mut position = current.clone();
        position.units_owned -= units;
        position.total_contributed = checked_sub(position.total_contributed, cash, "cashAmount")?;

        Ok(PlannedChange {
            transaction_type: TransactionType::Withdrawal,
            fund: FundState {
                total_value,
                total_units,
                reference_price: self.fund.reference_price,
            },
            position: Some(position),
            cash_amount: Some(-cash),
            units_delta: -units,
            price_before: Some(price),
            preserves_price: true,
            pct_change: None,
        })
    }

    fn plan_withdraw_all(&self, member_id: &str) -> UnitResult<PlannedChange> {
        let current = self
            .positions
            .get(member_id)
            .ok_or_else(|| UnitError::UnknownMember(member_id.to_string()))?;
        if current.is_closed() {
            return Err(UnitError::NotAllowed(format!(
                "position for member {} is already closed",
                member_id
            )));
        }
        let price = self.require_price()?;
        let units = current.units_owned;
        if units > self.fund.total_units {
            return Err(UnitError::insufficient_units(
                member_id,
                units,
                self.fund.total_units,
            ));
        }

        // The last holder takes the whole fund, so no value is left ownerless.
        let cash = if units == self.fund.total_units {
            self.fund.total_value
        } else {
            let cash = units
                .checked_mul(price)
                .ok_or_else(|| UnitError::invalid_amount("unitsOwned", units))?;
            self.round_cash(cash)
        };
        if cash > self.fund.total_value {
            return Err(UnitError::InsufficientFundValue {
                requested: cash,
                available: self.fund.total_value,
            });
        }

        let total_units = self.fund.total_units - units;
        let mut position = current.clone();
        position.units_owned = Decimal::ZERO;
        position.total_contributed = checked_sub(position.total_contributed, cash, "unitsOwned")?;

        Ok(PlannedChange {
            transaction_type: TransactionType::Withdrawal,
            fund: FundState {
                total_value: self.fund.total_value - cash,
                total_units,
                reference_price: self.fund.reference_price,
            },
            position: Some(position),
            cash_amount: Some(-cash),
            units_delta: -units,
            price_before: Some(price),
            preserves_price: true,
            pct_change: None,
        })
    }

    fn plan_adjustment(&self, member_id: &str, units_delta: Decimal) -> UnitResult<PlannedChange> {
        let units_delta = self.round_units(units_delta);
        if units_delta.is_zero() {
            return Err(UnitError::invalid_amount("unitsDelta", units_delta));
        }
        let price = self.require_price()?;
        let mut position = self.position_or_new(member_id);
        if units_delta < Decimal::ZERO && -units_delta > position.units_owned {
            return Err(UnitError::insufficient_units(
                member_id,
                -units_delta,
                position.units_owned,
            ));
        }

        let mut cash = units_delta
            .checked_mul(price)
            .map(|c| self.round_cash(c))
            .ok_or_else(|| UnitError::invalid_amount("unitsDelta", units_delta))?;
        if -units_delta == self.fund.total_units {
            cash = -self.fund.total_value;
        }
        let total_value = checked_add(self.fund.total_value, cash, "unitsDelta")?;
        if total_value < Decimal::ZERO {
            return Err(UnitError::InsufficientFundValue {
                requested: -cash,
                available: self.fund.total_value,
            });
        }
        let total_units = checked_add(self.fund.total_units, units_delta, "unitsDelta")?;

        position.units_owned = checked_add(position.units_owned, units_delta, "unitsDelta")?;
        position.total_contributed = checked_add(position.total_contributed, cash, "unitsDelta")?;

        Ok(PlannedChange {
            transaction_type: TransactionType::UnitAdjustment,
            fund: FundState {
                total_value,
                total_units,
                reference_price: self.fund.reference_price,
            },
            position: Some(position),
            cash_amount: Some(cash),
            units_delta,
            price_before: Some(price),
            preserves_price: true,
            pct_change: None,
        })
    }

    fn plan_revaluation(&self, new_total_value: Decimal) -> UnitResult<PlannedChange> {
        if new_total_value < Decimal::ZERO {
            return Err(UnitError::invalid_amount("newTotalValue", new_total_value));
        }
        if self.fund.total_units <= Decimal::ZERO {
            return Err(UnitError::UndefinedPrice(
                "cannot revalue a fund with no units outstanding".to_string(),
            ));
        }
        let price_before = self.current_unit_price();
        let new_price = new_total_value
            .checked_div(self.fund.total_units)
            .ok_or_else(|| UnitError::invalid_amount("newTotalValue", new_total_value))?;
        let value_change = checked_sub(new_total_value, self.fund.total_value, "newTotalValue")?;
        Ok(PlannedChange {
            transaction_type: TransactionType::Revaluation,
            fund: FundState {
                total_value: new_total_value,
                total_units: self.fund.total_units,
                reference_price: Some(new_price),
            },
            position: None,
            cash_amount: Some(value_change),
            units_delta: Decimal::ZERO,
            price_before,
            preserves_price: false,
            pct_change: price_before.and_then(|old| percent_change(old, new_price)),
        })
    }

    fn plan_seed_price(&self, price: Decimal) -> UnitResult<PlannedChange> {
        if price <= Decimal::ZERO {
            return Err(UnitError::invalid_amount("seedPrice", price));
        }
        if self.fund.total_units > Decimal::ZERO {
            return Err(UnitError::NotAllowed(
                "fund already has units outstanding; use a revaluation to change the price"
                    .to_string(),
            ));
        }
        Ok(PlannedChange {
            transaction_type: TransactionType::SeedPrice,
            fund: FundState {
                reference_price: Some(price),
                ..self.fund.clone()
            },
            position: None,
            cash_amount: None,
            units_delta: Decimal::ZERO,
            price_before: self.current_unit_price(),
            preserves_price: false,
            pct_change: None,
        })
    }

    /// Checks the invariants the planned state must satisfy before it is applied.
    fn verify(&self, plan: &PlannedChange) -> UnitResult<()> {
        if let Err(e) = check_fund_state(&plan.fund) {
            error!("Rejected {}: {}", plan.transaction_type, e);
            return Err(e);
        }

        let planned_member = plan.position.as_ref().map(|p| p.member_id.as_str());
        let mut units_sum = Decimal::ZERO;
        for position in self.positions.values() {
            if Some(position.member_id.as_str()) != planned_member {
                units_sum += position.units_owned;
            }
        }
        if let Some(position) = &plan.position {
            check_position(position)?;
            units_sum += position.units_owned;
        }
        if let Err(e) = check_units_sum(units_sum, &plan.fund) {
            error!("Rejected {}: {}", plan.transaction_type, e);
            return Err(e);
        }

        if plan.preserves_price {
            if let (Some(price), Some(implied)) =
                (plan.price_before, plan.fund.implied_unit_price())
            {
                if price > Decimal::ZERO
                    && (implied - price).abs() / price > self.settings.price_tolerance
                {
                    warn!(
                        "{} left the implied unit price at {}, beyond tolerance {} of {}",
                        plan.transaction_type, implied, self.settings.price_tolerance, price
                    );
                }
            }
        }
        Ok(())
    }

    // --- Helpers ---

    fn require_price(&self) -> UnitResult<Decimal> {
        self.current_unit_price().ok_or_else(|| {
            UnitError::UndefinedPrice(
                "fund has no units outstanding and no seed price".to_string(),
            )
        })
    }

    fn require_positive_price(&self) -> UnitResult<Decimal> {
        let price = self.require_price()?;
        if price <= Decimal::ZERO {
            return Err(UnitError::UndefinedPrice(format!(
                "unit price is {}; units cannot be priced",
                price
            )));
        }
        Ok(price)
    }

    fn units_for_cash(&self, cash: Decimal, price: Decimal) -> UnitResult<Decimal> {
        let units = cash
            .checked_div(price)
            .map(|u| self.round_units(u))
            .ok_or_else(|| UnitError::invalid_amount("cashAmount", cash))?;
        if units.is_zero() {
            return Err(UnitError::invalid_amount("cashAmount", cash));
        }
        Ok(units)
    }

    fn round_units(&self, units: Decimal) -> Decimal {
        units.round_dp_with_strategy(
            self.settings.unit_decimal_precision,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    fn round_cash(&self, cash: Decimal) -> Decimal {
        cash.round_dp_with_strategy(
            self.settings.cash_decimal_precision,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }

    fn position_or_new(&self, member_id: &str) -> MemberPosition {
        self.positions
            .get(member_id)
            .cloned()
            .unwrap_or_else(|| MemberPosition::new(member_id))
    }

    fn price_or_zero(&self) -> Decimal {
        self.current_unit_price().unwrap_or(Decimal::ZERO)
    }

    fn withdrawal_result(&self, tx: &Transaction) -> WithdrawalResult {
        WithdrawalResult {
            units_removed: -tx.units_delta,
            cash_paid: -tx.cash_amount.unwrap_or(Decimal::ZERO),
            new_unit_price: self.price_or_zero(),
        }
    }

    fn summarize(&self, position: &MemberPosition) -> MemberSummary {
        let price = self.price_or_zero();
        let current_value = position.current_value(price);
        MemberSummary {
            member_id: position.member_id.clone(),
            units_owned: position.units_owned,
            current_value,
            ownership_pct: position.ownership_pct(self.fund.total_units),
            total_contributed: position.total_contributed,
            unrealized_gain: current_value - position.total_contributed,
        }
    }
}

fn checked_add(a: Decimal, b: Decimal, field: &'static str) -> UnitResult<Decimal> {
    a.checked_add(b).ok_or_else(|| UnitError::invalid_amount(field, b))
}

fn checked_sub(a: Decimal, b: Decimal, field: &'static str) -> UnitResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| UnitError::invalid_amount(field, b))
}

/// `(new - old) / old` in percent. `None` for a zero old price or when the
/// ratio does not fit in a `Decimal`.
fn percent_change(old: Decimal, new: Decimal) -> Option<Decimal> {
    if old.is_zero() {
        return None;
    }
    new.checked_sub(old)?
        .checked_div(old)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

fn check_fund_state(fund: &FundState) -> UnitResult<()> {
    if fund.total_units < Decimal::ZERO {
        return Err(UnitError::invariant(format!(
            "total units is negative: {}",
            fund.total_units
        )));
    }
    if fund.total_value < Decimal::ZERO {
        return Err(UnitError::invariant(format!(
            "total value is negative: {}",
            fund.total_value
        )));
    }
    if fund.total_units.is_zero() && !fund.total_value.is_zero() {
        return Err(UnitError::invariant(format!(
            "fund holds {} with no units outstanding",
            fund.total_value
        )));
    }
    Ok(())
}

fn check_position(position: &MemberPosition) -> UnitResult<()> {
    if position.units_owned < Decimal::ZERO {
        return Err(UnitError::invariant(format!(
            "member {} holds negative units: {}",
            position.member_id, position.units_owned
        )));
    }
    Ok(())
}

fn check_units_sum(units_sum: Decimal, fund: &FundState) -> UnitResult<()> {
    if units_sum != fund.total_units {
        return Err(UnitError::invariant(format!(
            "member units sum to {} but the fund reports {}",
            units_sum, fund.total_units
        )));
    }
    Ok(())
}
