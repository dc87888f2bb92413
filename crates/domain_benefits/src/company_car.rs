//! Company car benefit
//!
//! The cash equivalent of a company car is its list price, less any capital
//! contribution (capped at £5,000), multiplied by the appropriate
//! percentage. When the car is only available for part of the tax year the
//! benefit is reduced in proportion to the days it was available. Private
//! fuel adds the fuel benefit: the year's fuel multiplier at the same
//! percentage.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Precision, TaxYear};

use crate::error::BenefitError;

/// Largest capital contribution that reduces the list price
pub const MAX_CAPITAL_CONTRIBUTION: Decimal = dec!(5000);

const ELECTRIC_PERCENTAGE: u32 = 2;
const MIN_PERCENTAGE: u32 = 15;
const MAX_PERCENTAGE: u32 = 37;
const DIESEL_SUPPLEMENT: u32 = 4;

/// Fuel type of a company car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

/// Details of the car and its availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCarParams {
    pub tax_year: TaxYear,
    pub list_price: Decimal,
    /// CO2 emissions in g/km
    pub co2_emissions: u32,
    pub fuel_type: FuelType,
    /// Diesel meets the RDE2 standard (no diesel supplement)
    #[serde(default)]
    pub rde2_compliant: bool,
    /// Zero-emission range in miles, for hybrids
    #[serde(default)]
    pub electric_range: u32,
    #[serde(default)]
    pub capital_contribution: Decimal,
    #[serde(default)]
    pub private_fuel_provided: bool,
    /// First day the car was available; defaults to the start of the tax year
    pub available_from: Option<NaiveDate>,
    /// Last day the car was available; defaults to the end of the tax year
    pub available_to: Option<NaiveDate>,
    /// Employee's marginal income tax rate, as a percentage
    pub tax_rate: Decimal,
}

/// Taxable value of a company car
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCarBenefit {
    /// Percentage of list price treated as a benefit
    pub appropriate_percentage: u32,
    /// Days in the tax year the car was available
    pub days_available: i64,
    /// Car benefit after contribution and proration
    pub cash_equivalent: Decimal,
    /// Fuel benefit; zero unless private fuel is provided
    pub fuel_benefit: Decimal,
    pub total_benefit: Decimal,
    pub tax_payable: Decimal,
    pub monthly_tax_cost: Decimal,
}

/// Values company car benefits
#[derive(Debug, Clone, Copy, Default)]
pub struct CarBenefitCalculator {
    precision: Precision,
}

impl CarBenefitCalculator {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// Appropriate percentage for the car
    ///
    /// Electric cars use 2%. Hybrids are banded by electric range. Petrol
    /// and diesel cars start at 15% and rise one point per 5 g/km, capped at
    /// 37%; diesels that are not RDE2 compliant pay a 4 point supplement
    /// within the same cap.
    pub fn appropriate_percentage(
        &self,
        fuel_type: FuelType,
        co2_emissions: u32,
        electric_range: u32,
        rde2_compliant: bool,
    ) -> u32 {
        match fuel_type {
            FuelType::Electric => ELECTRIC_PERCENTAGE,
            FuelType::Hybrid => match electric_range {
                r if r > 130 => 2,
                r if r > 70 => 5,
                r if r > 40 => 8,
                r if r > 30 => 12,
                _ => 14,
            },
            FuelType::Petrol | FuelType::Diesel => {
                let mut percentage =
                    (MIN_PERCENTAGE + co2_emissions / 5).clamp(MIN_PERCENTAGE, MAX_PERCENTAGE);
                if fuel_type == FuelType::Diesel && !rde2_compliant {
                    percentage = (percentage + DIESEL_SUPPLEMENT).min(MAX_PERCENTAGE);
                }
                percentage
            }
        }
    }

    /// Fuel benefit charge multiplier for the tax year
    pub fn fuel_benefit_multiplier(&self, tax_year: TaxYear) -> Result<Decimal, BenefitError> {
        match tax_year.0 {
            2024 => Ok(dec!(27800)),
            2025 => Ok(dec!(28200)),
            _ => Err(BenefitError::UnsupportedTaxYear(tax_year.code())),
        }
    }

    /// Days the car was available within the tax year
    pub fn days_available(&self, params: &CompanyCarParams) -> Result<i64, BenefitError> {
        let year_start = params.tax_year.start_date()?;
        let year_end = params.tax_year.end_date()?;
        let from = params.available_from.unwrap_or(year_start).max(year_start);
        let to = params.available_to.unwrap_or(year_end).min(year_end);

        if let (Some(start), Some(end)) = (params.available_from, params.available_to) {
            if end < start {
                return Err(BenefitError::validation("Car availability ends before it starts"));
            }
        }
        if to < from {
            return Ok(0);
        }
        Ok((to - from).num_days() + 1)
    }

    /// Calculates the benefit and the tax due on it
    pub fn calculate(&self, params: &CompanyCarParams) -> Result<CompanyCarBenefit, BenefitError> {
        validate(params)?;

        let percentage = self.appropriate_percentage(
            params.fuel_type,
            params.co2_emissions,
            params.electric_range,
            params.rde2_compliant,
        );
        let rate = Decimal::from(percentage);
        let days_available = self.days_available(params)?;
        let days_in_year = params.tax_year.days()?;
        let proportion = self
            .precision
            .divide(Decimal::from(days_available), Decimal::from(days_in_year))?;

        let contribution = params.capital_contribution.min(MAX_CAPITAL_CONTRIBUTION);
        let chargeable_price = (params.list_price - contribution).max(Decimal::ZERO);
        let cash_equivalent = self.precision.multiply(
            self.precision.percentage_of(chargeable_price, rate),
            proportion,
        );

        let fuel_benefit = if params.private_fuel_provided {
            let multiplier = self.fuel_benefit_multiplier(params.tax_year)?;
            self.precision
                .multiply(self.precision.percentage_of(multiplier, rate), proportion)
        } else {
            Decimal::ZERO
        };

        let total_benefit = self.precision.add(cash_equivalent, fuel_benefit);
        let tax_payable = self.precision.percentage_of(total_benefit, params.tax_rate);
        let monthly_tax_cost = self.precision.divide(tax_payable, dec!(12))?;

        debug!(
            fuel_type = ?params.fuel_type,
            percentage,
            days_available,
            total_benefit = %total_benefit,
            "calculated company car benefit"
        );

        Ok(CompanyCarBenefit {
            appropriate_percentage: percentage,
            days_available,
            cash_equivalent: self.precision.round_money(cash_equivalent),
            fuel_benefit: self.precision.round_money(fuel_benefit),
            total_benefit: self.precision.round_money(total_benefit),
            tax_payable: self.precision.round_money(tax_payable),
            monthly_tax_cost: self.precision.round_money(monthly_tax_cost),
        })
    }
}

fn validate(params: &CompanyCarParams) -> Result<(), BenefitError> {
    if params.list_price.is_sign_negative() && !params.list_price.is_zero() {
        return Err(BenefitError::validation("List price cannot be negative"));
    }
    if params.capital_contribution.is_sign_negative() && !params.capital_contribution.is_zero() {
        return Err(BenefitError::validation("Capital contribution cannot be negative"));
    }
    if params.tax_rate < Decimal::ZERO || params.tax_rate > dec!(100) {
        return Err(BenefitError::validation("Tax rate must be between 0 and 100"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_petrol_percentage_bounds() {
        let calc = CarBenefitCalculator::default();
        assert_eq!(calc.appropriate_percentage(FuelType::Petrol, 0, 0, true), 15);
        assert_eq!(calc.appropriate_percentage(FuelType::Petrol, 54, 0, true), 25);
        assert_eq!(calc.appropriate_percentage(FuelType::Petrol, 120, 0, true), 37);
    }

    #[test]
    fn test_diesel_supplement() {
        let calc = CarBenefitCalculator::default();
        assert_eq!(calc.appropriate_percentage(FuelType::Diesel, 80, 0, true), 31);
        assert_eq!(calc.appropriate_percentage(FuelType::Diesel, 80, 0, false), 35);
        assert_eq!(calc.appropriate_percentage(FuelType::Diesel, 100, 0, false), 37);
    }

    #[test]
    fn test_hybrid_range_bands() {
        let calc = CarBenefitCalculator::default();
        let cases = [
            (131, 2),
            (130, 5),
            (71, 5),
            (70, 8),
            (41, 8),
            (40, 12),
            (31, 12),
            (30, 14),
            (0, 14),
        ];
        for (range, expected) in cases {
            assert_eq!(
                calc.appropriate_percentage(FuelType::Hybrid, 20, range, true),
                expected,
                "range {range}"
            );
        }
    }

    #[test]
    fn test_electric_ignores_emissions() {
        let calc = CarBenefitCalculator::default();
        assert_eq!(calc.appropriate_percentage(FuelType::Electric, 200, 0, false), 2);
    }

    #[test]
    fn test_fuel_multiplier_years() {
        let calc = CarBenefitCalculator::default();
        assert_eq!(calc.fuel_benefit_multiplier(TaxYear(2024)).unwrap(), dec!(27800));
        assert!(matches!(
            calc.fuel_benefit_multiplier(TaxYear(2019)),
            Err(BenefitError::UnsupportedTaxYear(_))
        ));
    }
}
