//! Pre-built Test Fixtures
//!
//! Worked PAYE scenarios with known annual results for the 2024/25 rates.
//! Figures are hand-checked against the published thresholds.

use domain_paye::{PayeCalculator, TaxYearConfig};
use core_kernel::Precision;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A salary and code with its expected annual outcome
#[derive(Debug, Clone)]
pub struct PayeScenario {
    pub name: &'static str,
    pub salary: Decimal,
    pub tax_code: &'static str,
    pub expected_income_tax: Decimal,
    pub expected_national_insurance: Decimal,
    pub expected_net: Decimal,
}

/// Fixture for PAYE scenarios
pub struct PayeFixtures;

impl PayeFixtures {
    /// Calculator for the default (2024/25) year
    pub fn calculator() -> PayeCalculator {
        PayeCalculator::new(TaxYearConfig::year_2024_25(), Precision::default())
    }

    /// Basic rate taxpayer on the standard code
    pub fn basic_rate() -> PayeScenario {
        PayeScenario {
            name: "basic rate 50k",
            salary: dec!(50000),
            tax_code: "1257L",
            expected_income_tax: dec!(7486),
            expected_national_insurance: dec!(2994.40),
            expected_net: dec!(39519.60),
        }
    }

    /// Pay exactly at the personal allowance and primary threshold
    pub fn at_personal_allowance() -> PayeScenario {
        PayeScenario {
            name: "at personal allowance",
            salary: dec!(12570),
            tax_code: "1257L",
            expected_income_tax: Decimal::ZERO,
            expected_national_insurance: Decimal::ZERO,
            expected_net: dec!(12570),
        }
    }

    /// Higher rate taxpayer just at the taper threshold
    pub fn higher_rate() -> PayeScenario {
        PayeScenario {
            name: "higher rate 100k",
            salary: dec!(100000),
            tax_code: "1257L",
            expected_income_tax: dec!(27432),
            expected_national_insurance: dec!(4010.60),
            expected_net: dec!(68557.40),
        }
    }

    /// Second job taxed at the basic rate
    pub fn basic_rate_code() -> PayeScenario {
        PayeScenario {
            name: "BR second job",
            salary: dec!(30000),
            tax_code: "BR",
            expected_income_tax: dec!(6000),
            expected_national_insurance: dec!(1394.40),
            expected_net: dec!(22605.60),
        }
    }

    /// K code adding £5,000 of untaxed benefits
    pub fn k_code() -> PayeScenario {
        PayeScenario {
            name: "K500",
            salary: dec!(30000),
            tax_code: "K500",
            expected_income_tax: dec!(7000),
            expected_national_insurance: dec!(1394.40),
            expected_net: dec!(21605.60),
        }
    }

    /// Scottish taxpayer on the standard allowance
    pub fn scottish() -> PayeScenario {
        PayeScenario {
            name: "Scottish 50k",
            salary: dec!(50000),
            tax_code: "S1257L",
            expected_income_tax: dec!(9038.48),
            expected_national_insurance: dec!(2994.40),
            expected_net: dec!(37967.12),
        }
    }

    /// All scenarios
    pub fn all() -> Vec<PayeScenario> {
        vec![
            Self::basic_rate(),
            Self::at_personal_allowance(),
            Self::higher_rate(),
            Self::basic_rate_code(),
            Self::k_code(),
            Self::scottish(),
        ]
    }
}
