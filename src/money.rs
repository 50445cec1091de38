//! Money Conversion Module
//!
//! Conversion between the decimal text a balance is stored and displayed as,
//! and the integer minor units (cents) all arithmetic happens in.
//!
//! ## Internal Representation
//! - Amounts are `i64` cents; the scale factor is fixed at `10^2`
//! - Stored balances are exact 2-decimal text (`"7.65"`), never floats
//! - Rounding to minor units is half away from zero, which for the
//!   non-negative amounts a ledger holds is round-half-up
//!
//! ## Usage
//! ```rust
//! use balance_ledger::money::{to_decimal_string, to_minor_units};
//!
//! assert_eq!(to_minor_units("7.65").unwrap(), 765);
//! assert_eq!(to_decimal_string(765), "7.65");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use thiserror::Error;

/// Number of fractional digits in a stored balance.
pub const MINOR_UNIT_DECIMALS: u32 = 2;

/// Minor units per major unit (cents in a dollar).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must be at least 0.01")]
    NotPositive,

    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount too large, would overflow")]
    Overflow,
}

// ============================================================================
// Parse: Text/Number → Minor units
// ============================================================================

/// Convert a decimal amount to minor units, rounding half away from zero.
pub fn decimal_to_minor_units(value: Decimal) -> Result<i64, MoneyError> {
    let scaled = value
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .ok_or(MoneyError::Overflow)?;
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyError::Overflow)
}

/// Convert decimal text (e.g. `"7.65"`, `"12"`, `"7.6549"`) to minor units.
///
/// # Errors
/// * `InvalidAmount` - empty, unparseable, or non-finite text
/// * `Overflow` - result does not fit in `i64` cents
pub fn to_minor_units(amount_str: &str) -> Result<i64, MoneyError> {
    let trimmed = amount_str.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::InvalidAmount("empty string".into()));
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| MoneyError::InvalidAmount(trimmed.to_string()))?;

    decimal_to_minor_units(value)
}

/// Convert a floating-point amount to minor units.
///
/// Exists for callers that receive JSON numbers; NaN and infinities are
/// rejected instead of being coerced.
pub fn f64_to_minor_units(value: f64) -> Result<i64, MoneyError> {
    if !value.is_finite() {
        return Err(MoneyError::InvalidAmount(value.to_string()));
    }
    let decimal = Decimal::from_f64(value).ok_or(MoneyError::Overflow)?;
    decimal_to_minor_units(decimal)
}

/// Boundary rule for a transfer amount: at least `0.01` and no more than
/// two fractional digits once trailing zeros are dropped.
///
/// Returns the amount in minor units.
pub fn validate_transfer_amount(amount: Decimal) -> Result<i64, MoneyError> {
    let normalized = amount.normalize();
    if normalized.scale() > MINOR_UNIT_DECIMALS {
        return Err(MoneyError::PrecisionOverflow {
            provided: normalized.scale(),
            max: MINOR_UNIT_DECIMALS,
        });
    }
    let minor = decimal_to_minor_units(normalized)?;
    if minor <= 0 {
        return Err(MoneyError::NotPositive);
    }
    Ok(minor)
}

// ============================================================================
// Format: Minor units → Text
// ============================================================================

/// Format minor units as fixed 2-decimal text: `765` → `"7.65"`, `0` → `"0.00"`.
pub fn to_decimal_string(minor: i64) -> String {
    Decimal::new(minor, MINOR_UNIT_DECIMALS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_cents() {
        assert_eq!(to_minor_units("7.65").unwrap(), 765);
        assert_eq!(to_minor_units("0.00").unwrap(), 0);
        assert_eq!(to_minor_units("12").unwrap(), 1200);
        assert_eq!(to_minor_units("  1.5 ").unwrap(), 150);
    }

    #[test]
    fn test_round_half_up_at_third_digit() {
        assert_eq!(to_minor_units("7.6549").unwrap(), 765);
        assert_eq!(to_minor_units("7.655").unwrap(), 766);
        assert_eq!(to_minor_units("7.654").unwrap(), 765);
        assert_eq!(to_minor_units("0.005").unwrap(), 1);
        assert_eq!(to_minor_units("0.004").unwrap(), 0);
    }

    #[test]
    fn test_parse_float_input() {
        assert_eq!(f64_to_minor_units(7.6549).unwrap(), 765);
        assert_eq!(f64_to_minor_units(20.51).unwrap(), 2051);
        assert_eq!(f64_to_minor_units(0.0).unwrap(), 0);
    }

    #[test]
    fn test_rejects_non_finite_and_garbage() {
        assert!(matches!(
            f64_to_minor_units(f64::NAN),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            f64_to_minor_units(f64::INFINITY),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            to_minor_units("abc"),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(to_minor_units(""), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(
            to_minor_units("1.2.3"),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            to_minor_units("NaN"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_overflow() {
        let huge = "79228162514264337593543950335";
        assert_eq!(to_minor_units(huge), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_format_fixed_two_decimals() {
        assert_eq!(to_decimal_string(765), "7.65");
        assert_eq!(to_decimal_string(0), "0.00");
        assert_eq!(to_decimal_string(5), "0.05");
        assert_eq!(to_decimal_string(100), "1.00");
        assert_eq!(to_decimal_string(123456789), "1234567.89");
    }

    #[test]
    fn test_round_trip_sampled() {
        for cents in (0..10_000).chain([99_999_999, 1_000_000_000_000, i64::MAX / 100]) {
            assert_eq!(to_minor_units(&to_decimal_string(cents)).unwrap(), cents);
        }
    }

    #[test]
    fn test_validate_transfer_amount() {
        assert_eq!(validate_transfer_amount(Decimal::new(2051, 2)).unwrap(), 2051);
        assert_eq!(validate_transfer_amount(Decimal::new(1, 2)).unwrap(), 1);
        // trailing zeros are not extra precision
        assert_eq!(validate_transfer_amount(Decimal::new(1500, 3)).unwrap(), 150);
        assert_eq!(
            validate_transfer_amount(Decimal::new(1505, 3)),
            Err(MoneyError::PrecisionOverflow {
                provided: 3,
                max: 2
            })
        );
        assert_eq!(
            validate_transfer_amount(Decimal::ZERO),
            Err(MoneyError::NotPositive)
        );
        assert_eq!(
            validate_transfer_amount(Decimal::new(-100, 2)),
            Err(MoneyError::NotPositive)
        );
    }
}
