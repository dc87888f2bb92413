//! UK tax calendar types
//!
//! This module provides types for working with the PAYE calendar:
//! - Tax years run from 6 April to 5 April
//! - Tax months are numbered 1 (April) to 12 (March)
//! - Tax weeks are numbered from 1, with a week 53 in some years
//!
//! It also counts working days between dates, skipping weekends and a
//! configurable list of bank holidays.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Average number of weeks in a calendar month, used to map pay weeks onto months
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);

/// Number of monthly pay periods in a tax year
pub const MONTHS_IN_YEAR: u32 = 12;

/// Number of weekly pay periods in a tax year (excluding week 53)
pub const WEEKS_IN_YEAR: u32 = 52;

/// Earliest tax year accepted when parsing a year code
pub const MIN_TAX_YEAR: i32 = 1900;

/// Latest tax year accepted when parsing a year code
pub const MAX_TAX_YEAR: i32 = 9998;

/// England and Wales bank holidays for the years the rate tables cover
const BANK_HOLIDAYS: [(i32, u32, u32); 16] = [
    (2024, 1, 1),
    (2024, 3, 29),
    (2024, 4, 1),
    (2024, 5, 6),
    (2024, 5, 27),
    (2024, 8, 26),
    (2024, 12, 25),
    (2024, 12, 26),
    (2025, 1, 1),
    (2025, 4, 18),
    (2025, 4, 21),
    (2025, 5, 5),
    (2025, 5, 26),
    (2025, 8, 25),
    (2025, 12, 25),
    (2025, 12, 26),
];

/// Errors related to temporal operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid tax year code: {0}")]
    InvalidTaxYear(String),

    #[error("Invalid tax month number: {0}")]
    InvalidTaxMonth(u32),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("End date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// A UK tax year, identified by the calendar year in which it starts
///
/// `TaxYear(2024)` is the 2024/25 tax year running 6 April 2024 to 5 April 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxYear(pub i32);

impl TaxYear {
    /// Returns the tax year containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        let year = date.year();
        if (date.month(), date.day()) >= (4, 6) {
            TaxYear(year)
        } else {
            TaxYear(year - 1)
        }
    }

    /// First day of the tax year (6 April)
    pub fn start_date(&self) -> Result<NaiveDate, TemporalError> {
        NaiveDate::from_ymd_opt(self.0, 4, 6)
            .ok_or_else(|| TemporalError::DateOutOfRange(format!("{}-04-06", self.0)))
    }

    /// Last day of the tax year (5 April of the following year)
    pub fn end_date(&self) -> Result<NaiveDate, TemporalError> {
        self.0
            .checked_add(1)
            .and_then(|year| NaiveDate::from_ymd_opt(year, 4, 5))
            .ok_or_else(|| TemporalError::DateOutOfRange(format!("end of tax year {}", self.0)))
    }

    /// Number of days in the tax year
    pub fn days(&self) -> Result<i64, TemporalError> {
        Ok((self.end_date()? - self.start_date()?).num_days() + 1)
    }

    /// Returns true if the date falls within this tax year
    pub fn contains(&self, date: NaiveDate) -> bool {
        TaxYear::from_date(date) == *self
    }

    /// Year code used to key rate tables, e.g. `2024-25`
    pub fn code(&self) -> String {
        format!("{}-{:02}", self.0, self.end_suffix())
    }

    /// Last two digits of the year the tax year ends in
    fn end_suffix(&self) -> i32 {
        (self.0.rem_euclid(100) + 1) % 100
    }
}

impl fmt::Display for TaxYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.0, self.end_suffix())
    }
}

impl FromStr for TaxYear {
    type Err = TemporalError;

    /// Parses `2024-25`, `2024/25` or `2024`; the start year must lie in
    /// `MIN_TAX_YEAR..=MAX_TAX_YEAR`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TemporalError::InvalidTaxYear(s.to_string());
        let trimmed = s.trim();
        let (start, end) = match trimmed.split_once(['-', '/']) {
            Some((start, end)) => (start, Some(end)),
            None => (trimmed, None),
        };

        let start: i32 = start.parse().map_err(|_| invalid())?;
        if !(MIN_TAX_YEAR..=MAX_TAX_YEAR).contains(&start) {
            return Err(invalid());
        }
        if let Some(end) = end {
            let end: i32 = end.parse().map_err(|_| invalid())?;
            if end != (start + 1).rem_euclid(100) && end != start + 1 {
                return Err(invalid());
            }
        }
        Ok(TaxYear(start))
    }
}

/// Tax month within the PAYE year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxMonth {
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
    January,
    February,
    March,
}

impl TaxMonth {
    /// All tax months in PAYE order
    pub const ALL: [TaxMonth; 12] = [
        TaxMonth::April,
        TaxMonth::May,
        TaxMonth::June,
        TaxMonth::July,
        TaxMonth::August,
        TaxMonth::September,
        TaxMonth::October,
        TaxMonth::November,
        TaxMonth::December,
        TaxMonth::January,
        TaxMonth::February,
        TaxMonth::March,
    ];

    /// Returns the tax month for a period number (1 = April)
    pub fn from_number(number: u32) -> Result<Self, TemporalError> {
        match number {
            1..=12 => Ok(Self::ALL[(number - 1) as usize]),
            _ => Err(TemporalError::InvalidTaxMonth(number)),
        }
    }

    /// Period number within the tax year (April = 1)
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// Calendar month name
    pub fn label(&self) -> &'static str {
        match self {
            TaxMonth::April => "April",
            TaxMonth::May => "May",
            TaxMonth::June => "June",
            TaxMonth::July => "July",
            TaxMonth::August => "August",
            TaxMonth::September => "September",
            TaxMonth::October => "October",
            TaxMonth::November => "November",
            TaxMonth::December => "December",
            TaxMonth::January => "January",
            TaxMonth::February => "February",
            TaxMonth::March => "March",
        }
    }

    /// Returns the tax month containing the date (month 1 runs 6 April to 5 May)
    pub fn for_date(date: NaiveDate) -> Self {
        let mut index = (date.month() as i32 - 4).rem_euclid(12);
        if date.day() < 6 {
            index = (index - 1).rem_euclid(12);
        }
        Self::ALL[index as usize]
    }
}

impl fmt::Display for TaxMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the tax week (1..=53) containing the date
pub fn tax_week_for_date(date: NaiveDate) -> Result<u32, TemporalError> {
    let start = TaxYear::from_date(date).start_date()?;
    Ok(((date - start).num_days() / 7 + 1) as u32)
}

/// A pay period within the tax year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "number", rename_all = "lowercase")]
pub enum PeriodSelector {
    /// Monthly pay period (1 = April)
    Month(u32),
    /// Weekly pay period (1 = first week of April)
    Week(u32),
}

impl PeriodSelector {
    /// Returns the period number
    pub fn number(&self) -> u32 {
        match self {
            PeriodSelector::Month(n) | PeriodSelector::Week(n) => *n,
        }
    }

    /// Maximum valid period number for this kind of period
    pub fn max_number(&self) -> u32 {
        match self {
            PeriodSelector::Month(_) => MONTHS_IN_YEAR,
            PeriodSelector::Week(_) => WEEKS_IN_YEAR,
        }
    }

    /// Number of monthly periods up to and including this period
    ///
    /// Weeks map onto months via `ceil(week / 4.33)`. The result is capped at 12.
    pub fn month_count(&self) -> u32 {
        let months = match self {
            PeriodSelector::Month(n) => *n,
            PeriodSelector::Week(n) => (Decimal::from(*n) / WEEKS_PER_MONTH)
                .ceil()
                .to_u32()
                .unwrap_or(MONTHS_IN_YEAR),
        };
        months.min(MONTHS_IN_YEAR)
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodSelector::Month(n) => write!(f, "month {}", n),
            PeriodSelector::Week(n) => write!(f, "week {}", n),
        }
    }
}

/// Working-day rules for counting and adding days
///
/// The default calendar skips weekends and the built-in England and Wales
/// bank holidays. Either exclusion can be switched off, and further
/// holidays added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingCalendar {
    pub exclude_weekends: bool,
    pub exclude_holidays: bool,
    holidays: BTreeSet<NaiveDate>,
}

impl Default for WorkingCalendar {
    fn default() -> Self {
        Self::new(
            BANK_HOLIDAYS
                .iter()
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        )
    }
}

impl WorkingCalendar {
    /// A calendar excluding weekends and the given holidays
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            exclude_weekends: true,
            exclude_holidays: true,
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn with_weekends_excluded(mut self, exclude: bool) -> Self {
        self.exclude_weekends = exclude;
        self
    }

    pub fn with_holidays_excluded(mut self, exclude: bool) -> Self {
        self.exclude_holidays = exclude;
        self
    }

    /// Adds a holiday, e.g. a one-off bank holiday
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.iter()
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// True unless the date is skipped by an active exclusion
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !(self.exclude_weekends && Self::is_weekend(date))
            && !(self.exclude_holidays && self.is_holiday(date))
    }

    /// Calendar days from `start` to `end`, both inclusive
    pub fn calendar_days_between(start: NaiveDate, end: NaiveDate) -> Result<i64, TemporalError> {
        if end < start {
            return Err(TemporalError::InvalidDateRange { start, end });
        }
        Ok((end - start).num_days() + 1)
    }

    /// Working days from `start` to `end`, both inclusive
    pub fn working_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u32, TemporalError> {
        if end < start {
            return Err(TemporalError::InvalidDateRange { start, end });
        }
        let count = start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| self.is_working_day(*date))
            .count();
        Ok(count as u32)
    }

    /// The date `days` working days after `start`
    ///
    /// With both exclusions off this is plain calendar addition.
    pub fn add_working_days(
        &self,
        start: NaiveDate,
        days: u32,
    ) -> Result<NaiveDate, TemporalError> {
        let out_of_range = || TemporalError::DateOutOfRange(format!("{} + {} days", start, days));

        if !self.exclude_weekends && !self.exclude_holidays {
            return start
                .checked_add_days(Days::new(u64::from(days)))
                .ok_or_else(out_of_range);
        }

        let mut current = start;
        let mut added = 0;
        while added < days {
            current = current.succ_opt().ok_or_else(out_of_range)?;
            if self.is_working_day(current) {
                added += 1;
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tax_year_boundaries() {
        assert_eq!(TaxYear::from_date(date(2024, 4, 5)), TaxYear(2023));
        assert_eq!(TaxYear::from_date(date(2024, 4, 6)), TaxYear(2024));
        assert_eq!(TaxYear::from_date(date(2025, 1, 15)), TaxYear(2024));
    }

    #[test]
    fn test_tax_year_code_and_display() {
        assert_eq!(TaxYear(2024).code(), "2024-25");
        assert_eq!(TaxYear(2099).code(), "2099-00");
        assert_eq!(TaxYear(2024).to_string(), "2024/25");
    }

    #[test]
    fn test_week_to_month_mapping() {
        assert_eq!(PeriodSelector::Week(1).month_count(), 1);
        assert_eq!(PeriodSelector::Week(5).month_count(), 2);
        assert_eq!(PeriodSelector::Week(52).month_count(), 12);
    }
}
