//! Unit accounting domain models.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate state of the pooled fund.
///
/// `reference_price` is the unit price in force for cash conversions. Only a
/// seed or a revaluation sets it; deposits, withdrawals and unit adjustments
/// move value and units at that price and leave it untouched, so
/// `total_value / total_units` tracks it up to unit rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FundState {
    /// Current value of all pooled assets.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value: Decimal,
    /// Units outstanding across all members.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_units: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub reference_price: Option<Decimal>,
}

impl FundState {
    /// Unit price for new transactions. `None` means the fund is not yet
    /// capitalized.
    pub fn unit_price(&self) -> Option<Decimal> {
        self.reference_price.or_else(|| self.implied_unit_price())
    }

    /// `total_value / total_units`, `None` when no units are outstanding.
    pub fn implied_unit_price(&self) -> Option<Decimal> {
        if self.total_units > Decimal::ZERO {
            self.total_value.checked_div(self.total_units)
        } else {
            None
        }
    }
}

/// A member's holding in the fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPosition {
    pub member_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub units_owned: Decimal,
    /// Net cash contributed (deposits minus withdrawals). Cost basis only.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_contributed: Decimal,
}

impl MemberPosition {
    pub fn new(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            units_owned: Decimal::ZERO,
            total_contributed: Decimal::ZERO,
        }
    }

    pub fn current_value(&self, unit_price: Decimal) -> Decimal {
        self.units_owned * unit_price
    }

    /// Fraction of the fund owned, in `[0, 1]`. Zero when no units exist.
    pub fn ownership_pct(&self, total_units: Decimal) -> Decimal {
        if total_units > Decimal::ZERO {
            self.units_owned / total_units
        } else {
            Decimal::ZERO
        }
    }

    pub fn is_closed(&self) -> bool {
        self.units_owned.is_zero()
    }
}

/// Kind of a committed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    UnitAdjustment,
    Revaluation,
    SeedPrice,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::UnitAdjustment => "UNIT_ADJUSTMENT",
            TransactionType::Revaluation => "REVALUATION",
            TransactionType::SeedPrice => "SEED_PRICE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of an applied operation.
///
/// `cash_amount` is the signed flow into the fund: deposits positive,
/// withdrawals negative, the value change for a revaluation, `None` for a
/// seed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub transaction_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    pub member_id: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub cash_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str")]
    pub units_delta: Decimal,
    /// Price immediately before the transaction was applied.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub unit_price_at_transaction: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value_after: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_units_after: Decimal,
    pub notes: Option<String>,
}

/// Operation requested against the fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitOperation {
    #[serde(rename_all = "camelCase")]
    Deposit {
        member_id: String,
        cash_amount: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    Withdrawal {
        member_id: String,
        cash_amount: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    WithdrawAll { member_id: String },
    #[serde(rename_all = "camelCase")]
    UnitAdjustment {
        member_id: String,
        units_delta: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    Revaluation { new_total_value: Decimal },
    #[serde(rename_all = "camelCase")]
    SeedPrice { price: Decimal },
}

impl UnitOperation {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            UnitOperation::Deposit { .. } => TransactionType::Deposit,
            UnitOperation::Withdrawal { .. } | UnitOperation::WithdrawAll { .. } => {
                TransactionType::Withdrawal
            }
            UnitOperation::UnitAdjustment { .. } => TransactionType::UnitAdjustment,
            UnitOperation::Revaluation { .. } => TransactionType::Revaluation,
            UnitOperation::SeedPrice { .. } => TransactionType::SeedPrice,
        }
    }

    pub fn member_id(&self) -> Option<&str> {
        match self {
            UnitOperation::Deposit { member_id, .. }
            | UnitOperation::Withdrawal { member_id, .. }
            | UnitOperation::WithdrawAll { member_id }
            | UnitOperation::UnitAdjustment { member_id, .. } => Some(member_id.as_str()),
            UnitOperation::Revaluation { .. } | UnitOperation::SeedPrice { .. } => None,
        }
    }
}

/// Input model for applying an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub operation: UnitOperation,
    /// Defaults to now. Set when replaying historical entries.
    pub timestamp: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl From<UnitOperation> for NewTransaction {
    fn from(operation: UnitOperation) -> Self {
        Self {
            operation,
            timestamp: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResult {
    pub units_issued: Decimal,
    pub new_unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResult {
    pub units_removed: Decimal,
    pub cash_paid: Decimal,
    pub new_unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentResult {
    pub cash_equivalent: Decimal,
    pub new_unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevaluationResult {
    pub old_price: Decimal,
    pub new_price: Decimal,
    /// Percentage change of the unit price. `None` when the old price was zero.
    pub pct_change: Option<Decimal>,
}

/// Dashboard view of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub member_id: String,
    pub units_owned: Decimal,
    pub current_value: Decimal,
    pub ownership_pct: Decimal,
    pub total_contributed: Decimal,
    pub unrealized_gain: Decimal,
}

/// Dashboard view of the whole fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSummary {
    pub total_value: Decimal,
    pub total_units: Decimal,
    pub unit_price: Option<Decimal>,
    pub member_count: usize,
    pub transaction_count: usize,
    /// Currency the values are reported in.
    pub base_currency: String,
}

/// Persisted state loaded by the integration layer.
///
/// Persisted decimals serialize as strings so a stored snapshot reloads
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FundSnapshot {
    pub fund: FundState,
    pub positions: Vec<MemberPosition>,
}

/// Result of one engine call, persisted atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundCommit {
    pub fund: FundState,
    /// Positions touched by the transactions, in their final state.
    pub positions: Vec<MemberPosition>,
    pub transactions: Vec<Transaction>,
}
