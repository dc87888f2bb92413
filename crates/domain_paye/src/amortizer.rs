//! Per-period breakdown of annual figures
//!
//! On the cumulative basis the annual tax is spread evenly across the
//! months. On the non-cumulative (Week 1 / Month 1) basis each month is
//! taxed on its own pay against a twelfth of the annual allowance and bands.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::temporal::MONTHS_IN_YEAR;
use core_kernel::{PeriodSelector, Precision, TaxMonth};

use crate::bands::{TaxBand, TaxBandEngine};
use crate::error::PayeError;
use crate::tax_code::Allowance;

/// Basic rate used by the flat non-cumulative method
const FLAT_BASIC_RATE: Decimal = dec!(20);

/// How tax is spread across the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationBasis {
    /// Year-to-date totals; each month carries a twelfth of the annual tax
    Cumulative,
    /// Week 1 / Month 1; each month taxed independently
    NonCumulative,
}

/// Method for taxing a period on the non-cumulative basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonCumulativeMethod {
    /// Allocate the month's pay against the annual bands divided by twelve
    #[default]
    Banded,
    /// Charge the basic rate on the month's taxable pay
    FlatBasicRate,
}

/// One row of the breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDetail {
    pub period_label: String,
    /// 1 = April
    pub period_index: u32,
    pub gross_for_period: Decimal,
    /// Never negative; a K code's addition shows up in `taxable_for_period`
    pub tax_free_for_period: Decimal,
    pub taxable_for_period: Decimal,
    pub income_tax_for_period: Decimal,
    pub national_insurance_for_period: Decimal,
    pub net_for_period: Decimal,
}

/// Annual figures to spread across periods
#[derive(Debug, Clone)]
pub struct AmortizationInput<'a> {
    pub gross_annual: Decimal,
    pub total_income_tax: Decimal,
    pub total_national_insurance: Decimal,
    /// Effective annual allowance after taper
    pub tax_free_annual: Allowance,
    pub basis: CalculationBasis,
    /// Last period to include; `None` for the whole year
    pub target: Option<PeriodSelector>,
    /// Annual band table used for the non-cumulative basis
    pub income_tax_bands: &'a [TaxBand],
    /// K code amount added to income before allocation
    pub taxable_addition_annual: Decimal,
}

/// Spreads annual results over monthly periods
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodAmortizer {
    precision: Precision,
    method: NonCumulativeMethod,
}

impl PeriodAmortizer {
    pub fn new(precision: Precision, method: NonCumulativeMethod) -> Self {
        Self { precision, method }
    }

    /// Builds the period rows from April up to the target period
    pub fn amortize(&self, input: &AmortizationInput<'_>) -> Result<Vec<PeriodDetail>, PayeError> {
        let months = Decimal::from(MONTHS_IN_YEAR);
        let period_count = input
            .target
            .map(|target| target.month_count())
            .unwrap_or(MONTHS_IN_YEAR);

        let gross = self.precision.divide(input.gross_annual, months)?;
        let tax_free = match input.tax_free_annual {
            Allowance::Amount(amount) => self.precision.divide(amount, months)?,
            Allowance::Unlimited => gross,
        };
        let taxable = self.precision.subtract(gross, tax_free).max(Decimal::ZERO);
        let national_insurance = self.precision.divide(input.total_national_insurance, months)?;

        let income_tax = match input.basis {
            CalculationBasis::Cumulative => self.precision.divide(input.total_income_tax, months)?,
            CalculationBasis::NonCumulative => self.non_cumulative_tax(input, gross, taxable)?,
        };

        let gross_rounded = self.precision.round_money(gross);
        let tax_rounded = self.precision.round_money(income_tax);
        let ni_rounded = self.precision.round_money(national_insurance);
        let net = self
            .precision
            .subtract(self.precision.subtract(gross_rounded, tax_rounded), ni_rounded);

        debug!(
            basis = ?input.basis,
            periods = period_count,
            income_tax = %tax_rounded,
            national_insurance = %ni_rounded,
            "amortized annual figures"
        );

        TaxMonth::ALL
            .iter()
            .take(period_count as usize)
            .map(|month| {
                Ok(PeriodDetail {
                    period_label: month.label().to_string(),
                    period_index: month.number(),
                    gross_for_period: gross_rounded,
                    tax_free_for_period: self.precision.round_money(tax_free.max(Decimal::ZERO)),
                    taxable_for_period: self.precision.round_money(taxable),
                    income_tax_for_period: tax_rounded,
                    national_insurance_for_period: ni_rounded,
                    net_for_period: net,
                })
            })
            .collect()
    }

    /// Tax on a single month's pay taken in isolation
    fn non_cumulative_tax(
        &self,
        input: &AmortizationInput<'_>,
        monthly_gross: Decimal,
        monthly_taxable: Decimal,
    ) -> Result<Decimal, PayeError> {
        match self.method {
            NonCumulativeMethod::FlatBasicRate => {
                Ok(self.precision.percentage_of(monthly_taxable, FLAT_BASIC_RATE))
            }
            NonCumulativeMethod::Banded => {
                let engine = TaxBandEngine::new(self.precision);
                let bands = engine.period_bands(input.income_tax_bands, MONTHS_IN_YEAR)?;
                let addition = self
                    .precision
                    .divide(input.taxable_addition_annual, Decimal::from(MONTHS_IN_YEAR))?;
                let allocations =
                    engine.allocate(self.precision.add(monthly_gross, addition), &bands);
                Ok(engine.total_tax(&allocations))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandSchedule;

    fn uk_bands(allowance: Decimal) -> Vec<TaxBand> {
        BandSchedule::from_thresholds(&[
            ("Personal Allowance", dec!(0), Some(dec!(12570))),
            ("Basic Rate", dec!(20), Some(dec!(50270))),
            ("Higher Rate", dec!(40), Some(dec!(125140))),
            ("Additional Rate", dec!(45), None),
        ])
        .with_personal_allowance(allowance)
    }

    fn input(
        bands: &[TaxBand],
        basis: CalculationBasis,
        target: Option<PeriodSelector>,
    ) -> AmortizationInput<'_> {
        AmortizationInput {
            gross_annual: dec!(50000),
            total_income_tax: dec!(7486),
            total_national_insurance: dec!(2994.4),
            tax_free_annual: Allowance::Amount(dec!(12570)),
            basis,
            target,
            income_tax_bands: bands,
            taxable_addition_annual: Decimal::ZERO,
        }
    }

    #[test]
    fn test_cumulative_spreads_evenly() {
        let bands = uk_bands(dec!(12570));
        let periods = PeriodAmortizer::default()
            .amortize(&input(&bands, CalculationBasis::Cumulative, None))
            .unwrap();
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].period_label, "April");
        assert_eq!(periods[11].period_label, "March");
        assert_eq!(periods[0].gross_for_period, dec!(4166.67));
        assert_eq!(periods[0].tax_free_for_period, dec!(1047.50));
        assert_eq!(periods[0].taxable_for_period, dec!(3119.17));
        assert_eq!(periods[0].income_tax_for_period, dec!(623.83));
        assert_eq!(periods[0].national_insurance_for_period, dec!(249.53));
        assert_eq!(periods[0].net_for_period, dec!(3293.31));
    }

    #[test]
    fn test_target_week_maps_to_months() {
        let bands = uk_bands(dec!(12570));
        let amortizer = PeriodAmortizer::default();
        let periods = amortizer
            .amortize(&input(&bands, CalculationBasis::Cumulative, Some(PeriodSelector::Week(9))))
            .unwrap();
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[2].period_label, "June");

        let none = amortizer
            .amortize(&input(&bands, CalculationBasis::Cumulative, Some(PeriodSelector::Week(0))))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_non_cumulative_banded_matches_cumulative_for_steady_pay() {
        let bands = uk_bands(dec!(12570));
        let periods = PeriodAmortizer::default()
            .amortize(&input(
                &bands,
                CalculationBasis::NonCumulative,
                Some(PeriodSelector::Month(1)),
            ))
            .unwrap();
        // 3119.1666666666666667 taxable at 20%
        assert_eq!(periods[0].income_tax_for_period, dec!(623.83));
    }

    #[test]
    fn test_non_cumulative_flat_method() {
        let bands = uk_bands(dec!(12570));
        let mut annual =
            input(&bands, CalculationBasis::NonCumulative, Some(PeriodSelector::Month(1)));
        annual.gross_annual = dec!(90000);
        let periods = PeriodAmortizer::new(Precision::default(), NonCumulativeMethod::FlatBasicRate)
            .amortize(&annual)
            .unwrap();
        // (7500 - 1047.5) * 20%
        assert_eq!(periods[0].income_tax_for_period, dec!(1290.50));
    }

    #[test]
    fn test_k_code_addition_is_taxable_not_negative_allowance() {
        let bands = uk_bands(dec!(-5000));
        let mut annual =
            input(&bands, CalculationBasis::Cumulative, Some(PeriodSelector::Month(1)));
        annual.gross_annual = dec!(30000);
        annual.tax_free_annual = Allowance::Amount(dec!(-5000));
        let periods = PeriodAmortizer::default().amortize(&annual).unwrap();
        assert_eq!(periods[0].tax_free_for_period, Decimal::ZERO);
        assert_eq!(periods[0].taxable_for_period, dec!(2916.67));
    }

    #[test]
    fn test_unlimited_allowance_makes_everything_tax_free() {
        let bands = uk_bands(dec!(12570));
        let mut annual =
            input(&bands, CalculationBasis::Cumulative, Some(PeriodSelector::Month(1)));
        annual.tax_free_annual = Allowance::Unlimited;
        let periods = PeriodAmortizer::default().amortize(&annual).unwrap();
        assert_eq!(periods[0].tax_free_for_period, periods[0].gross_for_period);
        assert_eq!(periods[0].taxable_for_period, Decimal::ZERO);
    }
}
