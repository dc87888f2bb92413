//! PAYE calculation DTOs

use core_kernel::PeriodSelector;
use domain_paye::TaxCalculationResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_cumulative() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct CalculatePayeRequest {
    pub annual_salary: Decimal,
    #[validate(length(min = 1, max = 20, message = "Tax code is required"))]
    pub tax_code: String,
    #[serde(default = "default_cumulative")]
    pub is_cumulative: bool,
    /// Pay period to stop the breakdown at; the whole year when absent
    pub period: Option<PeriodSelector>,
    #[validate(length(min = 4, max = 7))]
    pub tax_year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PayeCalculationResponse {
    #[serde(flatten)]
    pub result: TaxCalculationResult,
    /// Income tax rate on the next pound earned, as a percentage
    pub marginal_rate: Decimal,
    pub tax_code_description: String,
}
