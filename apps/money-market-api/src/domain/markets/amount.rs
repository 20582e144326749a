//! Token amounts in base units.

use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An amount of a token in its smallest unit (e.g. 1 USDC = 1_000_000).
///
/// Deserializes from a non-negative JSON integer, or from a string of
/// decimal digits for values above `u64::MAX` (18-decimal tokens pass that
/// bound at ~18.4 whole tokens). Serializes as a digit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(u128);

impl TokenAmount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from base units.
    #[must_use]
    pub const fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    /// The amount in base units.
    #[must_use]
    pub const fn base_units(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert to whole-token units for display, without trailing zeros.
    ///
    /// `1_500_000` with 6 decimals renders as `1.5`.
    #[must_use]
    pub fn to_display(&self, decimals: u32) -> String {
        i128::try_from(self.0)
            .ok()
            .and_then(|units| Decimal::try_from_i128_with_scale(units, decimals).ok())
            .map_or_else(
                || (self.0 as f64 / 10_f64.powi(decimals as i32)).to_string(),
                |value| value.normalize().to_string(),
            )
    }
}

impl From<u64> for TokenAmount {
    fn from(units: u64) -> Self {
        Self(u128::from(units))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenAmountVisitor)
    }
}

struct TokenAmountVisitor;

impl Visitor<'_> for TokenAmountVisitor {
    type Value = TokenAmount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer amount in base units, or a string of decimal digits")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(TokenAmount::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
        Ok(TokenAmount(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value)
            .map(TokenAmount::from)
            .map_err(|_| E::custom(format!("amount must not be negative, got {value}")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Err(E::custom(format!(
            "amount must be an integer in base units; send values above {} as a digit string, got {value}",
            u64::MAX
        )))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(E::custom(format!(
                "amount string must contain only decimal digits, got {value:?}"
            )));
        }
        value
            .parse::<u128>()
            .map(TokenAmount)
            .map_err(|e| E::custom(format!("amount out of range: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1_000_000, 6, "1" ; "one usdc")]
    #[test_case(1_500_000, 6, "1.5" ; "one and a half usdc")]
    #[test_case(1, 6, "0.000001" ; "smallest usdc unit")]
    #[test_case(0, 18, "0" ; "zero")]
    #[test_case(2_000_000_000_000_000_000, 18, "2" ; "two dai")]
    #[test_case(12_345_678, 8, "0.12345678" ; "wbtc fraction")]
    fn display_converts_base_units(units: u128, decimals: u32, expected: &str) {
        assert_eq!(
            TokenAmount::from_base_units(units).to_display(decimals),
            expected
        );
    }

    #[test]
    fn display_falls_back_beyond_decimal_range() {
        let display = TokenAmount::from_base_units(u128::MAX).to_display(18);
        assert!(display.starts_with("340282366920938"), "got {display}");
    }

    #[test]
    fn deserializes_json_integer() {
        let amount: TokenAmount = serde_json::from_str("1500000").unwrap();
        assert_eq!(amount.base_units(), 1_500_000);
    }

    #[test]
    fn deserializes_digit_string_above_u64() {
        let amount: TokenAmount = serde_json::from_str("\"1000000000000000000000\"").unwrap();
        assert_eq!(amount.base_units(), 1_000_000_000_000_000_000_000);
    }

    #[test_case("-5" ; "negative")]
    #[test_case("1.5" ; "fractional")]
    #[test_case("\"12a\"" ; "non digit string")]
    #[test_case("\"\"" ; "empty string")]
    #[test_case("\"-1\"" ; "negative string")]
    #[test_case("null" ; "null")]
    #[test_case("1e30" ; "float beyond u64")]
    fn rejects_invalid_amounts(json: &str) {
        assert!(serde_json::from_str::<TokenAmount>(json).is_err());
    }

    #[test]
    fn serializes_as_digit_string() {
        let json = serde_json::to_string(&TokenAmount::from_base_units(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
