//! Money types for API boundary enforcement
//!
//! - `AmountInput`: Format-validated transfer amount
//! - `validate_amount`: business rule hook for `validator`

use std::borrow::Cow;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::money::{self, MoneyError};

// ============================================================================
// AmountInput: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Transfer amount as sent by clients
///
/// Accepts a JSON string (`"20.51"`) or a JSON number (`20.51`). The textual
/// form must be plain decimal notation:
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects scientific notation and a leading `+`
/// - Rejects empty strings
///
/// Range and precision (`>= 0.01`, at most 2 decimals) are checked by
/// [`validate_amount`] during DTO validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmountInput(Decimal);

impl AmountInput {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }

    pub fn from_decimal(d: Decimal) -> Self {
        Self(d)
    }
}

impl std::ops::Deref for AmountInput {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn parse_plain_decimal(s: &str) -> Result<Decimal, String> {
    if s.is_empty() {
        return Err("Amount cannot be empty".into());
    }
    if s.starts_with('.') {
        return Err("Invalid format: use 0.5 not .5".into());
    }
    if s.ends_with('.') {
        return Err("Invalid format: use 5.0 not 5.".into());
    }
    if s.contains('e') || s.contains('E') {
        return Err("Invalid format: scientific notation not allowed".into());
    }
    if s.starts_with('+') {
        return Err("Invalid format: + prefix not allowed".into());
    }
    Decimal::from_str(s).map_err(|e| format!("Invalid decimal: {}", e))
}

impl<'de> Deserialize<'de> for AmountInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        // Support both JSON number and JSON string
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumberOrString {
            String(String),
            Number(serde_json::Number),
        }

        let text = match NumberOrString::deserialize(deserializer)? {
            NumberOrString::String(s) => s,
            NumberOrString::Number(n) => n.to_string(),
        };
        parse_plain_decimal(&text).map(AmountInput).map_err(D::Error::custom)
    }
}

/// `validator` hook: at least `0.01`, at most 2 fractional digits.
pub fn validate_amount(amount: &AmountInput) -> Result<(), ValidationError> {
    match money::validate_transfer_amount(amount.inner()) {
        Ok(_) => Ok(()),
        Err(MoneyError::PrecisionOverflow { .. }) => Err(amount_error(
            "amount_precision",
            "amount must have at most 2 decimal places",
        )),
        Err(MoneyError::NotPositive) => {
            Err(amount_error("amount_min", "amount must not be less than 0.01"))
        }
        Err(_) => Err(amount_error("amount_range", "amount is out of range")),
    }
}

fn amount_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<AmountInput, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_accepts_string_and_number() {
        assert_eq!(*parse(r#""20.51""#).unwrap(), Decimal::new(2051, 2));
        assert_eq!(*parse("20.51").unwrap(), Decimal::new(2051, 2));
        assert_eq!(*parse("5").unwrap(), Decimal::new(5, 0));
    }

    #[test]
    fn test_rejects_dot_prefix_and_suffix() {
        let err = parse(r#"".5""#).unwrap_err();
        assert!(err.to_string().contains("use 0.5 not .5"));
        let err = parse(r#""5.""#).unwrap_err();
        assert!(err.to_string().contains("use 5.0 not 5."));
    }

    #[test]
    fn test_rejects_scientific_and_empty() {
        assert!(
            parse(r#""1.5e8""#)
                .unwrap_err()
                .to_string()
                .contains("scientific notation")
        );
        assert!(parse(r#""""#).unwrap_err().to_string().contains("cannot be empty"));
        assert!(parse("true").is_err());
    }

    #[test]
    fn test_validate_amount_rules() {
        let ok = AmountInput::from_decimal(Decimal::new(1, 2));
        assert!(validate_amount(&ok).is_ok());

        let too_precise = AmountInput::from_decimal(Decimal::new(1001, 3));
        assert_eq!(
            validate_amount(&too_precise).unwrap_err().code,
            "amount_precision"
        );

        let zero = AmountInput::from_decimal(Decimal::ZERO);
        assert_eq!(validate_amount(&zero).unwrap_err().code, "amount_min");

        let negative = parse(r#""-3.00""#).unwrap();
        assert_eq!(validate_amount(&negative).unwrap_err().code, "amount_min");
    }
}
