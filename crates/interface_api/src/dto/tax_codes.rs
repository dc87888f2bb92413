//! Tax code and tax year DTOs

use domain_paye::TaxCodeDescriptor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaxYearQuery {
    #[validate(length(min = 4, max = 7))]
    pub tax_year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaxCodeResponse {
    pub code: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
    pub descriptor: TaxCodeDescriptor,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct TaxYearSummary {
    pub tax_year: String,
    pub personal_allowance: Decimal,
    pub taper_threshold: Decimal,
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct TaxYearsResponse {
    pub default_tax_year: String,
    pub tax_years: Vec<TaxYearSummary>,
}
