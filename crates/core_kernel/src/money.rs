//! Rates and GBP presentation
//!
//! Monetary amounts are plain [`Decimal`] values in pounds. This module
//! provides the percentage [`Rate`] type used by tax schedules and the
//! presentation helpers for sterling amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a percentage rate (e.g., a tax or contribution rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate {
    /// The rate as a percentage (e.g., 20 for 20%)
    percent: Decimal,
}

impl Rate {
    /// A zero rate
    pub const ZERO: Rate = Rate { percent: Decimal::ZERO };

    /// Creates a rate from a percentage (e.g., 20 for 20%)
    pub const fn from_percentage(percent: Decimal) -> Self {
        Self { percent }
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.percent
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent.round_dp(4).normalize())
    }
}

/// Formats an amount as sterling with thousands separators, e.g. `£12,570.00`
pub fn format_gbp(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}£{}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_display_trims_scale() {
        let rate = Rate::from_percentage(dec!(8.00));
        assert_eq!(rate.as_percentage(), dec!(8));
        assert_eq!(rate.to_string(), "8%");
    }

    #[test]
    fn test_format_gbp() {
        assert_eq!(format_gbp(dec!(12570)), "£12,570.00");
        assert_eq!(format_gbp(dec!(999.995)), "£1,000.00");
        assert_eq!(format_gbp(dec!(-1234567.8)), "-£1,234,567.80");
        assert_eq!(format_gbp(Decimal::ZERO), "£0.00");
    }
}
