//! Employee National Insurance
//!
//! Class 1 primary contributions are charged per pay period. Annual figures
//! are produced by working out one monthly period and scaling the result
//! back up by twelve, which keeps the annual and monthly views consistent.

use rust_decimal::Decimal;
use tracing::debug;

use core_kernel::temporal::MONTHS_IN_YEAR;
use core_kernel::Precision;

use crate::bands::{BandLimit, TaxBand, TaxBandAllocation, TaxBandEngine};
use crate::error::PayeError;
use crate::tax_year::NationalInsuranceConfig;

pub const BELOW_PRIMARY_THRESHOLD: &str = "Below Primary Threshold";
pub const MAIN_RATE: &str = "Main Rate";
pub const HIGHER_RATE: &str = "Higher Rate";

/// Computes employee National Insurance
#[derive(Debug, Clone, Copy)]
pub struct NationalInsuranceEngine {
    config: NationalInsuranceConfig,
    precision: Precision,
    engine: TaxBandEngine,
}

impl NationalInsuranceEngine {
    pub fn new(config: NationalInsuranceConfig, precision: Precision) -> Self {
        Self {
            config,
            precision,
            engine: TaxBandEngine::new(precision),
        }
    }

    /// Contribution bands for a year expressed in `periods_per_year` pay periods
    pub fn period_bands(&self, periods_per_year: u32) -> Result<Vec<TaxBand>, PayeError> {
        let periods = Decimal::from(periods_per_year);
        let primary = self.precision.divide(self.config.primary_threshold, periods)?;
        let upper = self.precision.divide(self.config.upper_earnings_limit, periods)?;

        Ok(vec![
            TaxBand::new(
                BELOW_PRIMARY_THRESHOLD,
                Decimal::ZERO,
                Decimal::ZERO,
                BandLimit::Bounded(primary),
            ),
            TaxBand::new(MAIN_RATE, self.config.main_rate, primary, BandLimit::Bounded(upper)),
            TaxBand::new(HIGHER_RATE, self.config.higher_rate, upper, BandLimit::Unbounded),
        ])
    }

    /// Contributions on one period's earnings
    ///
    /// # Arguments
    ///
    /// * `period_income` - Gross pay for the period
    /// * `periods_per_year` - 12 for monthly pay, 52 for weekly pay
    pub fn compute_for_period(
        &self,
        period_income: Decimal,
        periods_per_year: u32,
    ) -> Result<Vec<TaxBandAllocation>, PayeError> {
        let bands = self.period_bands(periods_per_year)?;
        Ok(self.engine.allocate(period_income, &bands))
    }

    /// Annual contributions, computed monthly and scaled by twelve
    pub fn compute_annual(
        &self,
        gross_annual: Decimal,
    ) -> Result<Vec<TaxBandAllocation>, PayeError> {
        let monthly_income = self
            .precision
            .divide(gross_annual, Decimal::from(MONTHS_IN_YEAR))?;
        let monthly = self.compute_for_period(monthly_income, MONTHS_IN_YEAR)?;
        let annual = self.engine.annualise(monthly, MONTHS_IN_YEAR);

        debug!(
            gross = %gross_annual,
            total = %self.total(&annual),
            "computed annual national insurance"
        );
        Ok(annual)
    }

    /// Sum of contributions
    pub fn total(&self, allocations: &[TaxBandAllocation]) -> Decimal {
        self.engine.total_tax(allocations)
    }
}
