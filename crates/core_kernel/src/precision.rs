//! Precise decimal arithmetic for currency calculations
//!
//! All PAYE figures flow through a [`Precision`] value rather than a
//! process-wide decimal setting. The configuration is explicit: callers
//! choose the internal scale kept between chained operations and the
//! rounding strategy applied both internally and at presentation time.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by precise arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrecisionError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// Rounding applied to every intermediate and presented result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half away from zero (2.345 -> 2.35)
    HalfUp,
    /// Banker's rounding (2.345 -> 2.34)
    HalfEven,
    /// Truncate towards zero
    Down,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Down => RoundingStrategy::ToZero,
        }
    }
}

/// Configuration for a [`Precision`] instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionConfig {
    /// Decimal places retained between chained operations
    pub scale: u32,
    /// Rounding strategy
    pub rounding: RoundingMode,
    /// Decimal places used when presenting money
    pub money_places: u32,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            scale: 16,
            rounding: RoundingMode::HalfUp,
            money_places: 2,
        }
    }
}

/// Stateless precise arithmetic over [`Decimal`]
///
/// `rust_decimal` carries 28 significant digits; results are normalised to
/// the configured scale so repeated division and multiplication of currency
/// amounts never accumulate binary floating-point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Precision {
    config: PrecisionConfig,
}

impl Precision {
    /// Default tolerance used by [`Precision::approx_eq`]
    pub const DEFAULT_EPSILON: Decimal = dec!(0.0001);

    /// Creates a new arithmetic context
    pub fn new(config: PrecisionConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration
    pub fn config(&self) -> PrecisionConfig {
        self.config
    }

    fn normalize(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.config.scale, self.config.rounding.strategy())
    }

    /// Adds two values
    pub fn add(&self, a: Decimal, b: Decimal) -> Decimal {
        self.normalize(a + b)
    }

    /// Subtracts `b` from `a`
    pub fn subtract(&self, a: Decimal, b: Decimal) -> Decimal {
        self.normalize(a - b)
    }

    /// Multiplies two values
    pub fn multiply(&self, a: Decimal, b: Decimal) -> Decimal {
        self.normalize(a * b)
    }

    /// Divides `numerator` by `denominator`
    ///
    /// # Errors
    ///
    /// Returns [`PrecisionError::DivisionByZero`] when the denominator is exactly zero.
    pub fn divide(
        &self,
        numerator: Decimal,
        denominator: Decimal,
    ) -> Result<Decimal, PrecisionError> {
        if denominator.is_zero() {
            return Err(PrecisionError::DivisionByZero);
        }
        Ok(self.normalize(numerator / denominator))
    }

    /// Sums a sequence of values
    pub fn sum<I>(&self, values: I) -> Decimal
    where
        I: IntoIterator<Item = Decimal>,
    {
        values.into_iter().fold(Decimal::ZERO, |acc, v| self.add(acc, v))
    }

    /// Rounds to the given number of decimal places using the configured strategy
    pub fn round(&self, value: Decimal, places: u32) -> Decimal {
        value.round_dp_with_strategy(places, self.config.rounding.strategy())
    }

    /// Rounds to the presentation scale for money (pence)
    pub fn round_money(&self, value: Decimal) -> Decimal {
        self.round(value, self.config.money_places)
    }

    /// Applies a percentage to an amount (`amount * percentage / 100`)
    pub fn percentage_of(&self, amount: Decimal, percentage: Decimal) -> Decimal {
        self.normalize(amount * percentage / dec!(100))
    }

    /// Expresses `amount` as a percentage of `total`; a zero total yields zero
    pub fn percentage(&self, amount: Decimal, total: Decimal) -> Decimal {
        if total.is_zero() {
            return Decimal::ZERO;
        }
        self.normalize(amount / total * dec!(100))
    }

    /// Returns true when `a` and `b` differ by less than `epsilon`
    pub fn equals_within(&self, a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
        (a - b).abs() < epsilon
    }

    /// Returns true when `a` and `b` differ by less than [`Self::DEFAULT_EPSILON`]
    pub fn approx_eq(&self, a: Decimal, b: Decimal) -> bool {
        self.equals_within(a, b, Self::DEFAULT_EPSILON)
    }

    /// Parses a decimal string
    pub fn parse(&self, value: &str) -> Result<Decimal, PrecisionError> {
        let trimmed = value.trim();
        Decimal::from_str(trimmed)
            .map(|d| self.normalize(d))
            .map_err(|_| PrecisionError::InvalidNumber(trimmed.to_string()))
    }

    /// Parses a decimal string, falling back to `default` for blank or invalid input
    pub fn parse_or(&self, value: &str, default: Decimal) -> Decimal {
        if value.trim().is_empty() {
            return default;
        }
        self.parse(value).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_keeps_configured_scale() {
        let p = Precision::default();
        assert_eq!(p.divide(dec!(2), dec!(3)).unwrap(), dec!(0.6666666666666667));
    }

    #[test]
    fn test_divide_by_zero() {
        let p = Precision::default();
        assert_eq!(p.divide(dec!(1), Decimal::ZERO), Err(PrecisionError::DivisionByZero));
    }

    #[test]
    fn test_round_half_up() {
        let p = Precision::default();
        assert_eq!(p.round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(p.round_money(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn test_round_half_even() {
        let p = Precision::new(PrecisionConfig {
            rounding: RoundingMode::HalfEven,
            ..PrecisionConfig::default()
        });
        assert_eq!(p.round_money(dec!(2.345)), dec!(2.34));
    }

    #[test]
    fn test_percentage_of() {
        let p = Precision::default();
        assert_eq!(p.percentage_of(dec!(37430), dec!(20)), dec!(7486));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn add_then_subtract_restores_value(
            a in -1_000_000_000i64..1_000_000_000i64,
            b in -1_000_000_000i64..1_000_000_000i64
        ) {
            let p = Precision::default();
            let a = Decimal::new(a, 2);
            let b = Decimal::new(b, 2);
            prop_assert_eq!(p.subtract(p.add(a, b), b), a);
        }

        #[test]
        fn twelfths_reassemble_within_epsilon(pence in 0i64..10_000_000_000i64) {
            let p = Precision::default();
            let annual = Decimal::new(pence, 2);
            let monthly = p.divide(annual, dec!(12)).unwrap();
            prop_assert!(p.approx_eq(p.multiply(monthly, dec!(12)), annual));
        }
    }
}
