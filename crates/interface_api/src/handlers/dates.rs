//! Working-day handlers

use axum::{extract::State, Json};
use core_kernel::WorkingCalendar;
use validator::Validate;

use crate::dto::dates::*;
use crate::{error::ApiError, AppState};

/// Longest span, in calendar days, a count may cover
const MAX_SPAN_DAYS: i64 = 3660;

fn calendar(state: &AppState, exclude_weekends: bool, exclude_holidays: bool) -> WorkingCalendar {
    state
        .calendar
        .as_ref()
        .clone()
        .with_weekends_excluded(exclude_weekends)
        .with_holidays_excluded(exclude_holidays)
}

/// Counts calendar and working days between two dates, inclusive
pub async fn working_days(
    State(state): State<AppState>,
    Json(request): Json<WorkingDaysRequest>,
) -> Result<Json<WorkingDaysResponse>, ApiError> {
    let calendar_days =
        WorkingCalendar::calendar_days_between(request.start_date, request.end_date)?;
    if calendar_days > MAX_SPAN_DAYS {
        return Err(ApiError::Validation(format!(
            "Date range cannot exceed {} days",
            MAX_SPAN_DAYS
        )));
    }

    let working_days = calendar(&state, request.exclude_weekends, request.exclude_holidays)
        .working_days_between(request.start_date, request.end_date)?;

    Ok(Json(WorkingDaysResponse {
        calendar_days,
        working_days,
    }))
}

/// Adds working days to a date
pub async fn add_working_days(
    State(state): State<AppState>,
    Json(request): Json<AddWorkingDaysRequest>,
) -> Result<Json<AddWorkingDaysResponse>, ApiError> {
    request.validate()?;

    let date = calendar(&state, request.exclude_weekends, request.exclude_holidays)
        .add_working_days(request.start_date, request.days)?;

    Ok(Json(AddWorkingDaysResponse { date }))
}
