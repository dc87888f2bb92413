//! Benefit in kind handlers

use axum::{extract::State, Json};
use domain_benefits::CompanyCarParams;
use tracing::info;
use validator::Validate;

use crate::dto::benefits::*;
use crate::{error::ApiError, AppState};

/// Code assumed when a salary is given without one
const STANDARD_TAX_CODE: &str = "1257L";

/// Values a company car and the tax due on it
pub async fn company_car(
    State(state): State<AppState>,
    Json(request): Json<CompanyCarRequest>,
) -> Result<Json<CompanyCarResponse>, ApiError> {
    request.validate()?;

    let calculator = state.calculator(request.tax_year.as_deref())?;
    let tax_rate = match (request.tax_rate, request.annual_salary) {
        (Some(rate), _) => rate,
        (None, Some(salary)) => {
            let code = request.tax_code.as_deref().unwrap_or(STANDARD_TAX_CODE);
            calculator.marginal_rate(salary, code).as_percentage()
        }
        (None, None) => {
            return Err(ApiError::Validation(
                "Either tax_rate or annual_salary is required".to_string(),
            ))
        }
    };

    let tax_year = calculator.config().tax_year;
    let params = CompanyCarParams {
        tax_year,
        list_price: request.list_price,
        co2_emissions: request.co2_emissions,
        fuel_type: request.fuel_type,
        rde2_compliant: request.rde2_compliant,
        electric_range: request.electric_range,
        capital_contribution: request.capital_contribution,
        private_fuel_provided: request.private_fuel_provided,
        available_from: request.available_from,
        available_to: request.available_to,
        tax_rate,
    };
    let benefit = state.car_benefits.calculate(&params)?;

    info!(
        tax_year = %tax_year.code(),
        total_benefit = %benefit.total_benefit,
        "Company car benefit served"
    );

    Ok(Json(CompanyCarResponse {
        tax_year: tax_year.code(),
        tax_rate: tax_rate.normalize(),
        benefit,
    }))
}
