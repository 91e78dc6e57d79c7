//! Ledger import models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::units::{NewTransaction, TransactionType, UnitOperation};

/// One row of a historical ledger, as produced by the batch importer.
///
/// `amount` is cash for deposits and withdrawals, the new total value for a
/// revaluation, and the price for a seed. A withdrawal without an amount
/// closes the member's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub entry_type: TransactionType,
    pub member_id: Option<String>,
    pub amount: Option<Decimal>,
    pub units: Option<Decimal>,
    pub notes: Option<String>,
}

impl LedgerEntry {
    /// Converts the row into an engine request, checking required fields.
    pub fn to_new_transaction(&self) -> Result<NewTransaction> {
        let operation = match self.entry_type {
            TransactionType::Deposit => UnitOperation::Deposit {
                member_id: self.require_member()?,
                cash_amount: require(self.amount, "amount")?,
            },
            TransactionType::Withdrawal => match self.amount {
                Some(cash_amount) => UnitOperation::Withdrawal {
                    member_id: self.require_member()?,
                    cash_amount,
                },
                None => UnitOperation::WithdrawAll {
                    member_id: self.require_member()?,
                },
            },
            TransactionType::UnitAdjustment => UnitOperation::UnitAdjustment {
                member_id: self.require_member()?,
                units_delta: require(self.units, "units")?,
            },
            TransactionType::Revaluation => UnitOperation::Revaluation {
                new_total_value: require(self.amount, "amount")?,
            },
            TransactionType::SeedPrice => UnitOperation::SeedPrice {
                price: require(self.amount, "amount")?,
            },
        };
        Ok(NewTransaction {
            operation,
            timestamp: Some(self.timestamp),
            notes: self.notes.clone(),
        })
    }

    fn require_member(&self) -> Result<String> {
        match self.member_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(Error::Validation(ValidationError::MissingField(
                "memberId".to_string(),
            ))),
        }
    }
}

fn require(value: Option<Decimal>, field: &str) -> Result<Decimal> {
    value.ok_or_else(|| Error::Validation(ValidationError::MissingField(field.to_string())))
}

/// Outcome of a successful ledger import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub entries_applied: usize,
    pub deposits: usize,
    pub withdrawals: usize,
    pub adjustments: usize,
    pub revaluations: usize,
    pub total_value: Decimal,
    pub total_units: Decimal,
    pub unit_price: Option<Decimal>,
}
