//! Custom Test Assertions
//!
//! Provides assertion helpers for calculation results that give more
//! meaningful failure messages than standard assertions.

use domain_paye::{TaxBandAllocation, TaxCalculationResult};
use rust_decimal::Decimal;

/// Asserts that a decimal value is approximately equal to another
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a decimal value is within a range
pub fn assert_decimal_in_range(value: Decimal, min: Decimal, max: Decimal) {
    assert!(
        value >= min && value <= max,
        "Decimal {} is not in range [{}, {}]",
        value,
        min,
        max
    );
}

/// Asserts that a value carries at most two decimal places
pub fn assert_pence_precision(value: Decimal) {
    assert!(
        value.normalize().scale() <= 2,
        "Amount {} has more than 2 decimal places",
        value
    );
}

/// Asserts that band amounts sum to `expected` within `tolerance`
///
/// # Panics
///
/// Panics if the allocations do not account for all of the income
pub fn assert_allocations_conserve(
    allocations: &[TaxBandAllocation],
    expected: Decimal,
    tolerance: Decimal,
) {
    let allocated: Decimal = allocations.iter().map(|a| a.amount_in_band).sum();
    assert_decimal_approx_eq(allocated, expected, tolerance);
}

/// Asserts that every band carries a non-negative amount and tax
pub fn assert_allocations_non_negative(allocations: &[TaxBandAllocation]) {
    for allocation in allocations {
        assert!(
            allocation.amount_in_band >= Decimal::ZERO && allocation.tax_for_band >= Decimal::ZERO,
            "Band '{}' has negative figures: amount={}, tax={}",
            allocation.band.label,
            allocation.amount_in_band,
            allocation.tax_for_band
        );
    }
}

/// Asserts that net pay equals gross less tax and National Insurance, annually and per period
pub fn assert_net_identity(result: &TaxCalculationResult) {
    let summary = &result.annual_summary;
    assert_eq!(
        summary.net_annual,
        summary.gross - summary.total_income_tax - summary.total_national_insurance,
        "Annual net does not equal gross - tax - ni: {:?}",
        summary
    );
    for period in &result.monthly_breakdown {
        assert_eq!(
            period.net_for_period,
            period.gross_for_period
                - period.income_tax_for_period
                - period.national_insurance_for_period,
            "Net for {} does not equal gross - tax - ni",
            period.period_label
        );
    }
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err matching {}, got Ok({:?})",
                stringify!($pattern),
                value
            ),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_approx_eq_passes() {
        assert_decimal_approx_eq(dec!(100.001), dec!(100.002), dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "differ by more than tolerance")]
    fn test_decimal_approx_eq_fails() {
        assert_decimal_approx_eq(dec!(100), dec!(101), dec!(0.01));
    }

    #[test]
    fn test_pence_precision() {
        assert_pence_precision(dec!(623.83));
        assert_pence_precision(dec!(623.800000));
    }

    #[test]
    #[should_panic(expected = "more than 2 decimal places")]
    fn test_pence_precision_fails() {
        assert_pence_precision(dec!(623.833));
    }
}
