//! Property-based tests for the PAYE pipeline

use core_kernel::Precision;
use domain_paye::{parse, Allowance, CalculationBasis, PayeCalculator};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::{
    arbitrary_tax_code_strategy, assert_allocations_non_negative, assert_net_identity,
    ordered_salary_pair_strategy, period_strategy, salary_strategy, salary_with_pence_strategy,
    standard_tax_code_strategy, tax_code_strategy,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn parser_never_panics(code in arbitrary_tax_code_strategy()) {
        let descriptor = parse(&code);
        prop_assert_eq!(descriptor.code, code.trim().to_uppercase());
    }

    #[test]
    fn band_amounts_account_for_all_income(
        salary in salary_with_pence_strategy(),
        code in tax_code_strategy(),
    ) {
        let result = PayeCalculator::default()
            .calculate_tax_details(salary, &code, true, None)
            .unwrap();
        let addition = match result.effective_personal_allowance {
            Allowance::Amount(amount) if amount < Decimal::ZERO => -amount,
            _ => Decimal::ZERO,
        };
        let allocated: Decimal = result.income_tax_bands.iter().map(|a| a.amount_in_band).sum();
        prop_assert_eq!(allocated, salary + addition);
        assert_allocations_non_negative(&result.income_tax_bands);
        assert_allocations_non_negative(&result.ni_bands);
    }

    #[test]
    fn net_is_gross_less_deductions(
        salary in salary_with_pence_strategy(),
        code in tax_code_strategy(),
        cumulative in any::<bool>(),
        period in proptest::option::of(period_strategy()),
    ) {
        let result = PayeCalculator::default()
            .calculate_tax_details(salary, &code, cumulative, period)
            .unwrap();
        assert_net_identity(&result);
        prop_assert!(result.monthly_breakdown.len() <= 12);
    }

    #[test]
    fn tax_never_falls_as_pay_rises(
        (low, high) in ordered_salary_pair_strategy(),
        code in standard_tax_code_strategy(),
    ) {
        let calculator = PayeCalculator::default();
        let low_tax = calculator.calculate_income_tax(low, &code).unwrap();
        let high_tax = calculator.calculate_income_tax(high, &code).unwrap();
        prop_assert!(low_tax <= high_tax, "{} on {} vs {} on {}", low_tax, low, high_tax, high);
    }

    #[test]
    fn cumulative_periods_split_tax_evenly(
        salary in salary_strategy(),
        code in standard_tax_code_strategy(),
    ) {
        let precision = Precision::default();
        let result = PayeCalculator::default()
            .calculate_tax_details(salary, &code, true, None)
            .unwrap();
        prop_assert_eq!(result.basis, CalculationBasis::Cumulative);
        let expected = precision.round_money(result.annual_summary.total_income_tax / dec!(12));
        for period in &result.monthly_breakdown {
            prop_assert_eq!(period.income_tax_for_period, expected);
        }
    }

    #[test]
    fn calculation_is_idempotent(
        salary in salary_with_pence_strategy(),
        code in tax_code_strategy(),
    ) {
        let calculator = PayeCalculator::default();
        let first = calculator.calculate_tax_details(salary, &code, true, None).unwrap();
        let second = calculator.calculate_tax_details(salary, &code, true, None).unwrap();
        prop_assert_eq!(first, second);
    }
}
