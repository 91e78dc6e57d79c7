use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal places kept on unit quantities issued or removed by a transaction
pub const UNIT_DECIMAL_PRECISION: u32 = 8;

/// Decimal places kept on cash equivalents computed from unit quantities
pub const CASH_DECIMAL_PRECISION: u32 = 8;

/// Relative tolerance between the implied and the reference unit price
pub const PRICE_TOLERANCE: Decimal = dec!(0.00000001);

/// Default reporting currency for the club
pub const DEFAULT_BASE_CURRENCY: &str = "USD";
