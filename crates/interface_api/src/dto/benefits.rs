//! Benefit in kind DTOs

use chrono::NaiveDate;
use domain_benefits::{CompanyCarBenefit, FuelType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Company car details
///
/// The tax rate is taken from `tax_rate` when given, otherwise it is the
/// marginal rate for `annual_salary` on `tax_code`.
#[derive(Debug, Deserialize, Validate)]
pub struct CompanyCarRequest {
    #[validate(length(min = 4, max = 7))]
    pub tax_year: Option<String>,
    pub list_price: Decimal,
    #[validate(range(max = 1000))]
    pub co2_emissions: u32,
    pub fuel_type: FuelType,
    #[serde(default)]
    pub rde2_compliant: bool,
    #[serde(default)]
    #[validate(range(max = 1000))]
    pub electric_range: u32,
    #[serde(default)]
    pub capital_contribution: Decimal,
    #[serde(default)]
    pub private_fuel_provided: bool,
    pub available_from: Option<NaiveDate>,
    pub available_to: Option<NaiveDate>,
    /// Marginal income tax rate as a percentage
    pub tax_rate: Option<Decimal>,
    pub annual_salary: Option<Decimal>,
    #[validate(length(min = 1, max = 20))]
    pub tax_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompanyCarResponse {
    pub tax_year: String,
    /// Rate used for the tax payable, as a percentage
    pub tax_rate: Decimal,
    #[serde(flatten)]
    pub benefit: CompanyCarBenefit,
}
