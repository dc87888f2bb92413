//! Property-Based Test Generators
//!
//! Provides proptest strategies for salaries, tax codes and pay periods.

use core_kernel::PeriodSelector;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for whole-pound salaries up to £1,000,000
pub fn salary_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=1_000_000u32).prop_map(Decimal::from)
}

/// Strategy for salaries in pence up to £500,000
pub fn salary_with_pence_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=50_000_000i64).prop_map(|pence| Decimal::new(pence, 2))
}

/// Strategy for two ordered salaries `(lower, higher)`
pub fn ordered_salary_pair_strategy() -> impl Strategy<Value = (Decimal, Decimal)> {
    (0u32..=500_000u32, 0u32..=100_000u32)
        .prop_map(|(base, raise)| (Decimal::from(base), Decimal::from(base + raise)))
}

/// Strategy for standard cumulative codes such as `1257L`
pub fn standard_tax_code_strategy() -> impl Strategy<Value = String> {
    (1u32..=9999u32, prop::sample::select(vec!['L', 'M', 'N', 'T']))
        .prop_map(|(digits, letter)| format!("{}{}", digits, letter))
}

/// Strategy for K codes such as `K475`
pub fn k_code_strategy() -> impl Strategy<Value = String> {
    (1u32..=9999u32).prop_map(|digits| format!("K{}", digits))
}

/// Strategy for any well-formed code, including regional prefixes and special codes
pub fn tax_code_strategy() -> impl Strategy<Value = String> {
    let body = prop_oneof![
        4 => standard_tax_code_strategy(),
        2 => k_code_strategy(),
        1 => prop::sample::select(vec!["BR", "D0", "D1", "NT", "0T"]).prop_map(String::from),
    ];
    let region = prop::sample::select(vec!["", "S", "C"]);
    let suffix = prop::sample::select(vec!["", " W1", " M1", "X"]);
    (region, body, suffix)
        .prop_map(|(region, body, suffix)| format!("{}{}{}", region, body, suffix))
}

/// Strategy for arbitrary short strings to feed the parser
pub fn arbitrary_tax_code_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 /]{0,12}"
}

/// Strategy for month or week periods within the year
pub fn period_strategy() -> impl Strategy<Value = PeriodSelector> {
    prop_oneof![
        (1u32..=12u32).prop_map(PeriodSelector::Month),
        (1u32..=52u32).prop_map(PeriodSelector::Week),
    ]
}
