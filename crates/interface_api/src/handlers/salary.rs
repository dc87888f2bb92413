//! Salary conversion handlers

use axum::{extract::State, Json};
use domain_paye::salary::DEFAULT_HOURS_PER_WEEK;
use domain_paye::SalaryBreakdown;
use rust_decimal::Decimal;

use crate::dto::salary::*;
use crate::{error::ApiError, AppState};

const HOURS_IN_WEEK: u32 = 168;

/// Expresses a pay figure in every pay period
pub async fn convert(
    State(state): State<AppState>,
    Json(request): Json<SalaryConversionRequest>,
) -> Result<Json<SalaryConversionResponse>, ApiError> {
    if request.amount < Decimal::ZERO {
        return Err(ApiError::Validation("Amount cannot be negative".to_string()));
    }
    let hours_per_week = request.hours_per_week.unwrap_or(DEFAULT_HOURS_PER_WEEK);
    if hours_per_week <= Decimal::ZERO || hours_per_week > Decimal::from(HOURS_IN_WEEK) {
        return Err(ApiError::Validation(format!(
            "Hours per week must be greater than 0 and at most {}",
            HOURS_IN_WEEK
        )));
    }

    let breakdown = SalaryBreakdown::from_amount(
        &state.precision,
        request.amount,
        request.period,
        hours_per_week,
    )?;

    Ok(Json(SalaryConversionResponse {
        breakdown,
        hours_per_week,
    }))
}
