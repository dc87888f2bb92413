//! Salary period conversions
//!
//! Converts pay quoted per hour, day, week or month to an annual figure and
//! back, assuming 52 working weeks and 260 working days a year.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Precision;

use crate::error::PayeError;

/// Hours per week assumed when none are given
pub const DEFAULT_HOURS_PER_WEEK: Decimal = dec!(40);

const WEEKS_PER_YEAR: Decimal = dec!(52);
const WORKING_DAYS_PER_YEAR: Decimal = dec!(260);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// The period a pay figure is quoted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryPeriod {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl SalaryPeriod {
    /// Number of these periods in a year, given the working hours
    fn periods_per_year(&self, hours_per_week: Decimal) -> Decimal {
        match self {
            SalaryPeriod::Hourly => hours_per_week * WEEKS_PER_YEAR,
            SalaryPeriod::Daily => WORKING_DAYS_PER_YEAR,
            SalaryPeriod::Weekly => WEEKS_PER_YEAR,
            SalaryPeriod::Monthly => MONTHS_PER_YEAR,
            SalaryPeriod::Yearly => Decimal::ONE,
        }
    }
}

/// Converts an amount for `period` into an annual amount, rounded to pence
///
/// Hourly pay with zero or negative hours converts to zero.
pub fn to_annual(
    precision: &Precision,
    amount: Decimal,
    period: SalaryPeriod,
    hours_per_week: Decimal,
) -> Decimal {
    if period == SalaryPeriod::Hourly && hours_per_week <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let annual = precision.multiply(amount, period.periods_per_year(hours_per_week));
    precision.round_money(annual)
}

/// Converts an annual amount into an amount for `period`, rounded to pence
///
/// Hourly pay with zero or negative hours converts to zero.
pub fn from_annual(
    precision: &Precision,
    annual: Decimal,
    period: SalaryPeriod,
    hours_per_week: Decimal,
) -> Result<Decimal, PayeError> {
    if period == SalaryPeriod::Hourly && hours_per_week <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let amount = precision.divide(annual, period.periods_per_year(hours_per_week))?;
    Ok(precision.round_money(amount))
}

/// An annual salary expressed in every period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub yearly: Decimal,
    pub monthly: Decimal,
    pub weekly: Decimal,
    pub daily: Decimal,
    pub hourly: Decimal,
}

impl SalaryBreakdown {
    /// Converts `amount` quoted per `period` into all periods
    pub fn from_amount(
        precision: &Precision,
        amount: Decimal,
        period: SalaryPeriod,
        hours_per_week: Decimal,
    ) -> Result<Self, PayeError> {
        let yearly = to_annual(precision, amount, period, hours_per_week);
        Ok(Self {
            yearly,
            monthly: from_annual(precision, yearly, SalaryPeriod::Monthly, hours_per_week)?,
            weekly: from_annual(precision, yearly, SalaryPeriod::Weekly, hours_per_week)?,
            daily: from_annual(precision, yearly, SalaryPeriod::Daily, hours_per_week)?,
            hourly: from_annual(precision, yearly, SalaryPeriod::Hourly, hours_per_week)?,
        })
    }
}
