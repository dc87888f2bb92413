//! Salary conversion DTOs

use domain_paye::{SalaryBreakdown, SalaryPeriod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SalaryConversionRequest {
    pub amount: Decimal,
    pub period: SalaryPeriod,
    /// Working hours per week; 40 when absent
    pub hours_per_week: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct SalaryConversionResponse {
    #[serde(flatten)]
    pub breakdown: SalaryBreakdown,
    pub hours_per_week: Decimal,
}
