//! Monetary amount parsing.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts arrive string-encoded at the boundary and are parsed once into
//! `rust_decimal::Decimal`. Nothing downstream converts them back to strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while parsing a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The field was present but blank.
    #[error("amount for '{field}' is empty")]
    Empty {
        /// Name of the offending field.
        field: String,
    },

    /// The value is not a decimal number.
    #[error("amount for '{field}' is not a valid decimal: {value}")]
    Malformed {
        /// Name of the offending field.
        field: String,
        /// The raw value received.
        value: String,
    },

    /// The value is negative.
    #[error("amount for '{field}' must not be negative: {value}")]
    Negative {
        /// Name of the offending field.
        field: String,
        /// The parsed value.
        value: Decimal,
    },
}

/// Parses a string-encoded, non-negative monetary amount.
///
/// Accepts plain decimal notation (`"300"`, `"270.50"`) and scientific
/// notation (`"2.7e2"`).
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use staydesk_shared::types::money::parse_amount;
///
/// assert_eq!(parse_amount("commission", " 30.00 ").unwrap(), dec!(30.00));
/// assert!(parse_amount("commission", "-1").is_err());
/// ```
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty {
            field: field.to_string(),
        });
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| AmountError::Malformed {
            field: field.to_string(),
            value: trimmed.to_string(),
        })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(value)
}

/// Parses an optional amount; absent and blank values both yield `None`.
pub fn parse_optional_amount(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<Decimal>, AmountError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_amount(field, value).map(Some),
    }
}
