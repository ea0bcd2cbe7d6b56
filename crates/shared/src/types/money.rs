//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The code is not three ASCII letters.
    #[error("Invalid currency code: '{0}'")]
    Invalid(String),
}

/// ISO 4217-like currency code: exactly three ASCII letters, stored uppercase.
///
/// Accounts fix their currency at creation, so the code is validated once at
/// the boundary and compared by value afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Invalid` if the code is not three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(CurrencyError::Invalid(code.to_string()))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g., dollars, with cents as fraction).
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: CurrencyCode,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, usd());
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, usd());
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(usd());
        assert!(money.is_zero());
        assert!(!money.is_positive());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_money_sign() {
        assert!(Money::new(dec!(0.01), usd()).is_positive());
        assert!(Money::new(dec!(-10), usd()).is_negative());
        assert!(!Money::new(dec!(-10), usd()).is_positive());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(dec!(900.00), usd()).to_string(), "900.00 USD");
    }

    #[rstest]
    #[case("USD", "USD")]
    #[case("usd", "USD")]
    #[case(" kes ", "KES")]
    #[case("UGX", "UGX")]
    fn test_currency_parse_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(CurrencyCode::from_str(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("US")]
    #[case("USDT")]
    #[case("U$D")]
    #[case("12A")]
    fn test_currency_parse_invalid(#[case] input: &str) {
        assert_eq!(
            CurrencyCode::parse(input),
            Err(CurrencyError::Invalid(input.to_string()))
        );
    }

    #[test]
    fn test_currency_serde_validates() {
        let code: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(code.as_str(), "EUR");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EUR\"");
        assert!(serde_json::from_str::<CurrencyCode>("\"euro\"").is_err());
    }
}
