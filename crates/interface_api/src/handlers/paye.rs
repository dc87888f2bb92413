//! PAYE calculation handlers

use axum::{extract::State, Json};
use domain_paye::validation::validate_calculation_inputs;
use tracing::info;
use validator::Validate;

use crate::dto::paye::*;
use crate::{error::ApiError, AppState};

/// Calculates income tax, National Insurance and take-home pay
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculatePayeRequest>,
) -> Result<Json<PayeCalculationResponse>, ApiError> {
    request.validate()?;
    validate_calculation_inputs(request.annual_salary, &request.tax_code, request.period)
        .into_result()?;

    let calculator = state.calculator(request.tax_year.as_deref())?;
    let result = calculator.calculate_tax_details(
        request.annual_salary,
        &request.tax_code,
        request.is_cumulative,
        request.period,
    )?;
    let marginal_rate = calculator.marginal_rate(request.annual_salary, &request.tax_code);
    let tax_code_description = calculator
        .config()
        .tax_code_parser()
        .parse(&request.tax_code)
        .describe();

    info!(
        tax_year = %result.tax_year,
        tax_code = %result.tax_code.code,
        basis = ?result.basis,
        "PAYE calculation served"
    );

    Ok(Json(PayeCalculationResponse {
        result,
        marginal_rate: marginal_rate.as_percentage(),
        tax_code_description,
    }))
}
