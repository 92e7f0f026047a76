//! Fixed-point helpers for quantities and money.
//!
//! Quantities, thresholds and costs are stored with exactly two decimal places.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Inputs above this magnitude are rejected before decimal conversion.
const MAX_CONVERTIBLE: f64 = 1e16;

/// A numeric input exactly as the client sent it: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

/// Why a raw numeric input could not be turned into a decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// Not a finite, plain decimal number.
    NotANumber,
    /// Finite but far beyond any representable business value.
    OutOfRange,
}

impl RawNumber {
    /// Parse strictly into a decimal, keeping the scale the client wrote.
    ///
    /// `"1.50"` keeps scale 2, `"1.505"` keeps scale 3 so callers can reject it.
    pub fn parse(&self) -> Result<Decimal, NumberError> {
        match self {
            RawNumber::Number(value) => {
                if !value.is_finite() {
                    return Err(NumberError::NotANumber);
                }
                if value.abs() > MAX_CONVERTIBLE {
                    return Err(NumberError::OutOfRange);
                }
                Decimal::from_str(&value.to_string()).map_err(|_| NumberError::NotANumber)
            }
            RawNumber::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(NumberError::NotANumber);
                }
                Decimal::from_str(trimmed).map_err(|e| match e {
                    rust_decimal::Error::ExceedsMaximumPossibleValue
                    | rust_decimal::Error::LessThanMinimumPossibleValue => NumberError::OutOfRange,
                    _ => NumberError::NotANumber,
                })
            }
        }
    }
}

impl From<Decimal> for RawNumber {
    fn from(value: Decimal) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

/// Round half away from zero to two places and pin the scale at 2.
pub fn two_places(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_numbers_and_strings() {
        assert_eq!(RawNumber::from(3.5).parse(), Ok(dec!(3.5)));
        assert_eq!(RawNumber::from(" 12.25 ").parse(), Ok(dec!(12.25)));
        assert_eq!(RawNumber::Number(7.0).parse(), Ok(dec!(7)));
    }

    #[test]
    fn keeps_written_scale() {
        let parsed = RawNumber::from("1.505").parse().unwrap();
        assert_eq!(parsed.scale(), 3);
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(RawNumber::from("abc").parse(), Err(NumberError::NotANumber));
        assert_eq!(RawNumber::from("").parse(), Err(NumberError::NotANumber));
        assert_eq!(RawNumber::from("12abc").parse(), Err(NumberError::NotANumber));
        assert_eq!(RawNumber::Number(f64::NAN).parse(), Err(NumberError::NotANumber));
        assert_eq!(RawNumber::Number(f64::INFINITY).parse(), Err(NumberError::NotANumber));
        assert_eq!(RawNumber::Number(1e300).parse(), Err(NumberError::OutOfRange));
    }

    #[test]
    fn deserializes_untagged() {
        let n: RawNumber = serde_json::from_str("10").unwrap();
        assert_eq!(n.parse(), Ok(dec!(10)));
        let s: RawNumber = serde_json::from_str("\"2.50\"").unwrap();
        assert_eq!(s.parse(), Ok(dec!(2.50)));
    }

    #[test]
    fn two_places_pins_scale() {
        let v = two_places(dec!(7));
        assert_eq!(v.to_string(), "7.00");
        assert_eq!(two_places(dec!(0.125)).to_string(), "0.13");
    }
}
