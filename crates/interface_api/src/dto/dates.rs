//! Working-day DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_excluded() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct WorkingDaysRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_excluded")]
    pub exclude_weekends: bool,
    #[serde(default = "default_excluded")]
    pub exclude_holidays: bool,
}

#[derive(Debug, Serialize)]
pub struct WorkingDaysResponse {
    pub calendar_days: i64,
    pub working_days: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddWorkingDaysRequest {
    pub start_date: NaiveDate,
    #[validate(range(max = 3660))]
    pub days: u32,
    #[serde(default = "default_excluded")]
    pub exclude_weekends: bool,
    #[serde(default = "default_excluded")]
    pub exclude_holidays: bool,
}

#[derive(Debug, Serialize)]
pub struct AddWorkingDaysResponse {
    pub date: NaiveDate,
}
