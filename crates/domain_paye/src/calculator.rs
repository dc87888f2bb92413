//! PAYE calculation entry point
//!
//! [`PayeCalculator::calculate_tax_details`] runs the full pipeline: parse
//! the tax code, work out the effective allowance, allocate income across
//! the region's bands, compute National Insurance, and spread the annual
//! results across pay periods. Arithmetic runs at full internal precision;
//! money is rounded to pence only on the way out.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{PeriodSelector, Precision, Rate};

use crate::amortizer::{
    AmortizationInput, CalculationBasis, NonCumulativeMethod, PeriodAmortizer, PeriodDetail,
};
use crate::bands::{
    apply_allowance_taper, BandLimit, BandSchedule, TaxBand, TaxBandAllocation, TaxBandEngine,
};
use crate::error::PayeError;
use crate::national_insurance::NationalInsuranceEngine;
use crate::tax_code::{Allowance, SpecialRate, TaxCodeDescriptor};
use crate::tax_year::TaxYearConfig;

/// Annual totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub gross: Decimal,
    pub total_income_tax: Decimal,
    pub total_national_insurance: Decimal,
    /// `gross - total_income_tax - total_national_insurance`; negative for large K codes
    pub net_annual: Decimal,
}

/// Full result of a PAYE calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub tax_year: String,
    pub tax_code: TaxCodeDescriptor,
    pub effective_personal_allowance: Allowance,
    pub basis: CalculationBasis,
    pub annual_summary: AnnualSummary,
    pub monthly_breakdown: Vec<PeriodDetail>,
    pub income_tax_bands: Vec<TaxBandAllocation>,
    pub ni_bands: Vec<TaxBandAllocation>,
}

impl TaxCalculationResult {
    /// The last period in the breakdown, i.e. the requested period
    pub fn current_period(&self) -> Option<&PeriodDetail> {
        self.monthly_breakdown.last()
    }
}

/// Band table and income to allocate for one calculation
struct IncomeTaxPlan {
    bands: Vec<TaxBand>,
    allowance: Allowance,
    taxable_addition: Decimal,
}

/// Calculates income tax and National Insurance for one tax year
#[derive(Debug, Clone)]
pub struct PayeCalculator {
    config: TaxYearConfig,
    precision: Precision,
    non_cumulative_method: NonCumulativeMethod,
}

impl PayeCalculator {
    /// Creates a calculator for a tax year
    pub fn new(config: TaxYearConfig, precision: Precision) -> Self {
        Self {
            config,
            precision,
            non_cumulative_method: NonCumulativeMethod::default(),
        }
    }

    /// Sets how Week 1 / Month 1 periods are taxed
    pub fn with_non_cumulative_method(mut self, method: NonCumulativeMethod) -> Self {
        self.non_cumulative_method = method;
        self
    }

    /// The tax year this calculator applies
    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    /// Calculates annual and per-period tax and National Insurance
    ///
    /// # Arguments
    ///
    /// * `annual_salary` - Gross annual pay
    /// * `tax_code` - HMRC tax code; unrecognised codes fall back to the standard allowance
    /// * `is_cumulative` - `false` forces the Week 1 / Month 1 basis
    /// * `current_period` - Last period to include in the breakdown; `None` for the whole year
    pub fn calculate_tax_details(
        &self,
        annual_salary: Decimal,
        tax_code: &str,
        is_cumulative: bool,
        current_period: Option<PeriodSelector>,
    ) -> Result<TaxCalculationResult, PayeError> {
        let descriptor = self.config.tax_code_parser().parse(tax_code);
        debug!(
            salary = %annual_salary,
            tax_code = %descriptor.code,
            region = ?descriptor.region,
            special = ?descriptor.special_rate,
            "calculating tax details"
        );

        let plan = self.income_tax_plan(&descriptor, annual_salary);
        let engine = TaxBandEngine::new(self.precision);
        let allocations = engine.allocate(
            self.precision.add(annual_salary, plan.taxable_addition),
            &plan.bands,
        );
        let total_income_tax = engine.total_tax(&allocations);

        let ni_engine =
            NationalInsuranceEngine::new(self.config.national_insurance, self.precision);
        let ni_bands = ni_engine.compute_annual(annual_salary)?;
        let total_national_insurance = ni_engine.total(&ni_bands);

        let basis = if is_cumulative && !descriptor.is_non_cumulative {
            CalculationBasis::Cumulative
        } else {
            CalculationBasis::NonCumulative
        };

        let monthly_breakdown = PeriodAmortizer::new(self.precision, self.non_cumulative_method)
            .amortize(&AmortizationInput {
                gross_annual: annual_salary,
                total_income_tax,
                total_national_insurance,
                tax_free_annual: plan.allowance,
                basis,
                target: current_period,
                income_tax_bands: &plan.bands,
                taxable_addition_annual: plan.taxable_addition,
            })?;

        let gross = self.precision.round_money(annual_salary);
        let tax = self.precision.round_money(total_income_tax);
        let ni = self.precision.round_money(total_national_insurance);
        let annual_summary = AnnualSummary {
            gross,
            total_income_tax: tax,
            total_national_insurance: ni,
            net_annual: self.precision.subtract(self.precision.subtract(gross, tax), ni),
        };

        info!(
            tax_year = %self.config.code(),
            gross = %annual_summary.gross,
            income_tax = %annual_summary.total_income_tax,
            national_insurance = %annual_summary.total_national_insurance,
            basis = ?basis,
            "tax calculation complete"
        );

        Ok(TaxCalculationResult {
            tax_year: self.config.code(),
            tax_code: descriptor,
            effective_personal_allowance: plan.allowance,
            basis,
            annual_summary,
            monthly_breakdown,
            income_tax_bands: self.round_allocations(allocations),
            ni_bands: self.round_allocations(ni_bands),
        })
    }

    /// Annual income tax, rounded to pence
    pub fn calculate_income_tax(
        &self,
        annual_salary: Decimal,
        tax_code: &str,
    ) -> Result<Decimal, PayeError> {
        Ok(self
            .calculate_tax_details(annual_salary, tax_code, true, None)?
            .annual_summary
            .total_income_tax)
    }

    /// Annual pay after income tax and National Insurance
    pub fn calculate_take_home_pay(
        &self,
        annual_salary: Decimal,
        tax_code: &str,
    ) -> Result<Decimal, PayeError> {
        Ok(self
            .calculate_tax_details(annual_salary, tax_code, true, None)?
            .annual_summary
            .net_annual)
    }

    /// Income tax rate on the next pound earned
    pub fn marginal_rate(&self, annual_salary: Decimal, tax_code: &str) -> Rate {
        let descriptor = self.config.tax_code_parser().parse(tax_code);
        let plan = self.income_tax_plan(&descriptor, annual_salary);
        TaxBandEngine::new(self.precision).marginal_rate(
            self.precision.add(annual_salary, plan.taxable_addition),
            &plan.bands,
        )
    }

    /// Picks the band table, effective allowance and K code addition
    fn income_tax_plan(
        &self,
        descriptor: &TaxCodeDescriptor,
        annual_salary: Decimal,
    ) -> IncomeTaxPlan {
        let rates = self.config.rates_for(descriptor.region);

        if let Some(special) = descriptor.flat_special_rate() {
            return IncomeTaxPlan {
                bands: BandSchedule::flat(flat_label(special), rates.flat_rates.rate_for(special))
                    .bands()
                    .to_vec(),
                allowance: descriptor.base_allowance,
                taxable_addition: Decimal::ZERO,
            };
        }

        let base = descriptor.base_allowance.amount().unwrap_or(Decimal::ZERO);
        let effective = apply_allowance_taper(base, annual_salary, self.config.taper_threshold);
        debug!(base = %base, effective = %effective, "effective personal allowance");

        IncomeTaxPlan {
            bands: rates.schedule.with_personal_allowance(effective),
            allowance: Allowance::Amount(effective),
            taxable_addition: (-effective).max(Decimal::ZERO),
        }
    }

    fn round_allocations(&self, allocations: Vec<TaxBandAllocation>) -> Vec<TaxBandAllocation> {
        allocations
            .into_iter()
            .map(|mut allocation| {
                allocation.amount_in_band = self.precision.round_money(allocation.amount_in_band);
                allocation.tax_for_band = self.precision.round_money(allocation.tax_for_band);
                allocation.band.lower_bound =
                    self.precision.round_money(allocation.band.lower_bound);
                if let BandLimit::Bounded(upper) = allocation.band.upper_bound {
                    allocation.band.upper_bound =
                        BandLimit::Bounded(self.precision.round_money(upper));
                }
                allocation
            })
            .collect()
    }
}

impl Default for PayeCalculator {
    fn default() -> Self {
        Self::new(TaxYearConfig::default(), Precision::default())
    }
}

fn flat_label(special: SpecialRate) -> String {
    let name = match special {
        SpecialRate::BR => "Basic Rate",
        SpecialRate::D0 => "Higher Rate",
        SpecialRate::D1 => "Additional Rate",
        SpecialRate::NT => "No Tax",
        SpecialRate::ZeroT => "No Allowance",
    };
    format!("{} ({})", name, special.as_str())
}
