//! Unit accounting error taxonomy.
//!
//! Every engine failure is local and synchronous. A rejected operation leaves
//! the fund untouched.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by the unit accounting engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Non-positive cash or unit amount supplied.
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: Decimal },

    /// No units outstanding and no seed price established.
    #[error("Unit price is undefined: {0}")]
    UndefinedPrice(String),

    /// The operation would drive a member's units below zero.
    #[error("Insufficient units for member {member_id}: requested {requested}, available {available}")]
    InsufficientUnits {
        member_id: String,
        requested: Decimal,
        available: Decimal,
    },

    /// The operation would drive the fund's total value below zero.
    #[error("Insufficient fund value: requested {requested}, available {available}")]
    InsufficientFundValue {
        requested: Decimal,
        available: Decimal,
    },

    /// No position exists for the member.
    #[error("Member {0} has no position in the fund")]
    UnknownMember(String),

    /// Persisted state no longer satisfies the fund invariants.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Operation not allowed in the fund's current state.
    #[error("Operation not allowed: {0}")]
    NotAllowed(String),
}

impl UnitError {
    pub fn invalid_amount(field: &'static str, value: Decimal) -> Self {
        Self::InvalidAmount { field, value }
    }

    pub fn insufficient_units(
        member_id: impl Into<String>,
        requested: Decimal,
        available: Decimal,
    ) -> Self {
        Self::InsufficientUnits {
            member_id: member_id.into(),
            requested,
            available,
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Returns true for validation failures a member can correct from a form.
    ///
    /// `UndefinedPrice` and `InvariantViolation` describe the fund's state,
    /// not the request, and map to a "contact administrator" message.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            UnitError::InvalidAmount { .. }
                | UnitError::InsufficientUnits { .. }
                | UnitError::InsufficientFundValue { .. }
                | UnitError::UnknownMember(_)
                | UnitError::NotAllowed(_)
        )
    }

    /// Stable code for the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::InvalidAmount { .. } => "INVALID_AMOUNT",
            UnitError::UndefinedPrice(_) => "UNDEFINED_PRICE",
            UnitError::InsufficientUnits { .. } => "INSUFFICIENT_UNITS",
            UnitError::InsufficientFundValue { .. } => "INSUFFICIENT_FUND_VALUE",
            UnitError::UnknownMember(_) => "UNKNOWN_MEMBER",
            UnitError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            UnitError::NotAllowed(_) => "NOT_ALLOWED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = UnitError::invalid_amount("cashAmount", dec!(-5));
        assert_eq!(err.to_string(), "Invalid amount for cashAmount: -5");

        let err = UnitError::insufficient_units("m1", dec!(10), dec!(4));
        assert_eq!(
            err.to_string(),
            "Insufficient units for member m1: requested 10, available 4"
        );
    }

    #[test]
    fn test_user_error_classification() {
        assert!(UnitError::invalid_amount("cashAmount", dec!(0)).is_user_error());
        assert!(UnitError::UnknownMember("m1".to_string()).is_user_error());
        assert!(!UnitError::UndefinedPrice("no units".to_string()).is_user_error());
        assert!(!UnitError::invariant("sum mismatch").is_user_error());
        assert_eq!(UnitError::invariant("x").code(), "INVARIANT_VIOLATION");
    }
}
