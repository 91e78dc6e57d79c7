//! Fund settings model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CASH_DECIMAL_PRECISION, DEFAULT_BASE_CURRENCY, PRICE_TOLERANCE, UNIT_DECIMAL_PRECISION,
};
use crate::errors::{Error, Result};

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Numeric and reporting settings for one fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundSettings {
    /// Decimal places kept on issued/removed units.
    pub unit_decimal_precision: u32,
    /// Decimal places kept on cash equivalents of unit adjustments.
    pub cash_decimal_precision: u32,
    /// Relative drift allowed between `total_value / total_units` and the
    /// reference price before a warning is logged.
    pub price_tolerance: Decimal,
    pub base_currency: String,
}

impl Default for FundSettings {
    fn default() -> Self {
        Self {
            unit_decimal_precision: UNIT_DECIMAL_PRECISION,
            cash_decimal_precision: CASH_DECIMAL_PRECISION,
            price_tolerance: PRICE_TOLERANCE,
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
        }
    }
}

impl FundSettings {
    /// Parses settings from JSON; missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: FundSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings values.
    pub fn validate(&self) -> Result<()> {
        if self.unit_decimal_precision > MAX_DECIMAL_SCALE {
            return Err(Error::InvalidConfigValue(format!(
                "unitDecimalPrecision must be at most {}, got {}",
                MAX_DECIMAL_SCALE, self.unit_decimal_precision
            )));
        }
        if self.cash_decimal_precision > MAX_DECIMAL_SCALE {
            return Err(Error::InvalidConfigValue(format!(
                "cashDecimalPrecision must be at most {}, got {}",
                MAX_DECIMAL_SCALE, self.cash_decimal_precision
            )));
        }
        if self.price_tolerance < Decimal::ZERO {
            return Err(Error::InvalidConfigValue(
                "priceTolerance cannot be negative".to_string(),
            ));
        }
        if self.base_currency.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "baseCurrency cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies a partial update, validating the result before returning it.
    pub fn with_update(&self, update: &FundSettingsUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(precision) = update.unit_decimal_precision {
            next.unit_decimal_precision = precision;
        }
        if let Some(precision) = update.cash_decimal_precision {
            next.cash_decimal_precision = precision;
        }
        if let Some(tolerance) = update.price_tolerance {
            next.price_tolerance = tolerance;
        }
        if let Some(ref currency) = update.base_currency {
            next.base_currency = currency.trim().to_uppercase();
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial settings update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSettingsUpdate {
    pub unit_decimal_precision: Option<u32>,
    pub cash_decimal_precision: Option<u32>,
    pub price_tolerance: Option<Decimal>,
    pub base_currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = FundSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.unit_decimal_precision, 8);
        assert_eq!(settings.price_tolerance, dec!(0.00000001));
        assert!(PRICE_TOLERANCE > Decimal::ZERO);
        assert_eq!(settings.base_currency, "USD");
    }

    #[test]
    fn test_from_json_fills_missing_keys() {
        let settings = FundSettings::from_json(r#"{"unitDecimalPrecision": 6}"#).unwrap();
        assert_eq!(settings.unit_decimal_precision, 6);
        assert_eq!(settings.cash_decimal_precision, 8);
        assert_eq!(settings.base_currency, "USD");
    }

    #[test]
    fn test_from_json_rejects_out_of_range_precision() {
        let result = FundSettings::from_json(r#"{"unitDecimalPrecision": 40}"#);
        assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
    }

    #[test]
    fn test_with_update_normalizes_currency() {
        let update = FundSettingsUpdate {
            base_currency: Some(" cad ".to_string()),
            ..Default::default()
        };
        let settings = FundSettings::default().with_update(&update).unwrap();
        assert_eq!(settings.base_currency, "CAD");
    }

    #[test]
    fn test_with_update_rejects_negative_tolerance() {
        let update = FundSettingsUpdate {
            price_tolerance: Some(dec!(-0.1)),
            ..Default::default()
        };
        assert!(FundSettings::default().with_update(&update).is_err());
    }
}
