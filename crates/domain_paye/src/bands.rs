//! Progressive tax bands and allocation
//!
//! A [`BandSchedule`] is an ordered, contiguous list of [`TaxBand`]s. The
//! first band is the tax-free personal allowance; its upper bound is
//! replaced at calculation time with the holder's effective allowance and
//! the remaining bands are rebased behind it, keeping their widths.
//!
//! [`TaxBandEngine::allocate`] walks the bands in order and assigns each
//! band `min(remaining, width)` of the income.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Precision, Rate};

use crate::error::PayeError;

/// Upper limit of a tax band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandLimit {
    /// Band ends at this amount (exclusive)
    Bounded(Decimal),
    /// Top band with no upper limit
    Unbounded,
}

impl BandLimit {
    /// Returns the bound as an amount, if bounded
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            BandLimit::Bounded(value) => Some(*value),
            BandLimit::Unbounded => None,
        }
    }
}

/// A single rate band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    /// Display label, e.g. "Basic Rate"
    pub label: String,
    /// Rate charged on income inside the band, as a percentage
    pub rate_percent: Decimal,
    /// Lower bound (inclusive)
    pub lower_bound: Decimal,
    /// Upper bound (exclusive)
    pub upper_bound: BandLimit,
}

impl TaxBand {
    /// Creates a band
    pub fn new(
        label: impl Into<String>,
        rate_percent: Decimal,
        lower_bound: Decimal,
        upper_bound: BandLimit,
    ) -> Self {
        Self {
            label: label.into(),
            rate_percent,
            lower_bound,
            upper_bound,
        }
    }

    /// Band width, or `None` for the unbounded top band
    pub fn width(&self) -> Option<Decimal> {
        self.upper_bound
            .amount()
            .map(|upper| (upper - self.lower_bound).max(Decimal::ZERO))
    }

    /// The band's rate
    pub fn rate(&self) -> Rate {
        Rate::from_percentage(self.rate_percent)
    }
}

/// Income assigned to one band and the tax due on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBandAllocation {
    #[serde(flatten)]
    pub band: TaxBand,
    /// Portion of income that fell inside the band
    pub amount_in_band: Decimal,
    /// Tax charged on that portion
    pub tax_for_band: Decimal,
}

/// An ordered, contiguous set of tax bands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSchedule {
    bands: Vec<TaxBand>,
}

impl BandSchedule {
    /// Builds a schedule from `(label, rate percent, upper threshold)` rows
    ///
    /// Each band starts where the previous one ends; the first starts at zero.
    /// A `None` threshold marks the unbounded top band.
    pub fn from_thresholds(rows: &[(&str, Decimal, Option<Decimal>)]) -> Self {
        let mut lower = Decimal::ZERO;
        let bands = rows
            .iter()
            .map(|(label, rate, upper)| {
                let upper_bound = match upper {
                    Some(value) => BandLimit::Bounded(*value),
                    None => BandLimit::Unbounded,
                };
                let band = TaxBand::new(*label, *rate, lower, upper_bound);
                if let Some(value) = upper {
                    lower = *value;
                }
                band
            })
            .collect();
        Self { bands }
    }

    /// A single band charging `rate_percent` on all income
    pub fn flat(label: impl Into<String>, rate_percent: Decimal) -> Self {
        Self {
            bands: vec![TaxBand::new(label, rate_percent, Decimal::ZERO, BandLimit::Unbounded)],
        }
    }

    /// Checks that the schedule is non-empty, ascending, contiguous and ends unbounded
    pub fn validate(&self) -> Result<(), PayeError> {
        let last = self
            .bands
            .last()
            .ok_or_else(|| PayeError::InvalidSchedule("schedule has no bands".to_string()))?;
        if last.upper_bound != BandLimit::Unbounded {
            return Err(PayeError::InvalidSchedule(format!(
                "top band '{}' must be unbounded",
                last.label
            )));
        }

        let mut expected_lower = Decimal::ZERO;
        for (index, band) in self.bands.iter().enumerate() {
            if band.lower_bound != expected_lower {
                return Err(PayeError::InvalidSchedule(format!(
                    "band '{}' starts at {} but previous band ends at {}",
                    band.label, band.lower_bound, expected_lower
                )));
            }
            match band.upper_bound {
                BandLimit::Bounded(upper) if upper < band.lower_bound => {
                    return Err(PayeError::InvalidSchedule(format!(
                        "band '{}' ends below its start",
                        band.label
                    )));
                }
                BandLimit::Bounded(upper) => expected_lower = upper,
                BandLimit::Unbounded if index + 1 < self.bands.len() => {
                    return Err(PayeError::InvalidSchedule(format!(
                        "band '{}' is unbounded but is not the top band",
                        band.label
                    )));
                }
                BandLimit::Unbounded => {}
            }
        }
        Ok(())
    }

    /// The configured bands
    pub fn bands(&self) -> &[TaxBand] {
        &self.bands
    }

    /// The personal allowance encoded in the first band
    pub fn personal_allowance(&self) -> Decimal {
        self.bands
            .first()
            .and_then(|band| band.upper_bound.amount())
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns the bands with the first band's upper bound set to `allowance`
    ///
    /// Later bands keep their configured widths and are shifted so the
    /// result stays contiguous. A negative allowance gives a zero-width
    /// first band.
    pub fn with_personal_allowance(&self, allowance: Decimal) -> Vec<TaxBand> {
        let allowance = allowance.max(Decimal::ZERO);
        let mut lower = Decimal::ZERO;
        let mut rebased = Vec::with_capacity(self.bands.len());

        for (index, band) in self.bands.iter().enumerate() {
            let upper_bound = if index == 0 && self.bands.len() > 1 {
                BandLimit::Bounded(allowance)
            } else {
                match band.width() {
                    Some(width) => BandLimit::Bounded(lower + width),
                    None => BandLimit::Unbounded,
                }
            };
            rebased.push(TaxBand::new(band.label.clone(), band.rate_percent, lower, upper_bound));
            if let BandLimit::Bounded(upper) = upper_bound {
                lower = upper;
            }
        }
        rebased
    }
}

/// Reduces a positive allowance by one pound for every two pounds of income over `threshold`
///
/// The reduction is floored to whole pounds and never exceeds the allowance.
/// Negative (K code) allowances are returned unchanged.
pub fn apply_allowance_taper(allowance: Decimal, income: Decimal, threshold: Decimal) -> Decimal {
    if income <= threshold || allowance <= Decimal::ZERO {
        return allowance;
    }
    let reduction = ((income - threshold) / dec!(2)).floor().min(allowance);
    allowance - reduction
}

/// Allocates income across bands
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxBandEngine {
    precision: Precision,
}

impl TaxBandEngine {
    /// Creates an engine using the given arithmetic settings
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// Walks the bands in order assigning `min(remaining, width)` to each
    ///
    /// Every band is reported; once the income is used up later bands
    /// receive zero.
    pub fn allocate(&self, income: Decimal, bands: &[TaxBand]) -> Vec<TaxBandAllocation> {
        let mut remaining = income.max(Decimal::ZERO);

        bands
            .iter()
            .map(|band| {
                let amount = if remaining <= Decimal::ZERO {
                    Decimal::ZERO
                } else {
                    match band.width() {
                        Some(width) => remaining.min(width),
                        None => remaining,
                    }
                };
                let tax = self.precision.percentage_of(amount, band.rate_percent);
                remaining = self.precision.subtract(remaining, amount);

                debug!(
                    band = %band.label,
                    rate = %band.rate_percent,
                    amount = %amount,
                    tax = %tax,
                    "allocated income to band"
                );

                TaxBandAllocation {
                    band: band.clone(),
                    amount_in_band: amount,
                    tax_for_band: tax,
                }
            })
            .collect()
    }

    /// Sum of tax across allocations
    pub fn total_tax(&self, allocations: &[TaxBandAllocation]) -> Decimal {
        self.precision.sum(allocations.iter().map(|a| a.tax_for_band))
    }

    /// Divides every bound by `periods` to express an annual table per pay period
    pub fn period_bands(&self, bands: &[TaxBand], periods: u32) -> Result<Vec<TaxBand>, PayeError> {
        let divisor = Decimal::from(periods);
        bands
            .iter()
            .map(|band| {
                let upper_bound = match band.upper_bound {
                    BandLimit::Bounded(upper) => {
                        BandLimit::Bounded(self.precision.divide(upper, divisor)?)
                    }
                    BandLimit::Unbounded => BandLimit::Unbounded,
                };
                Ok(TaxBand::new(
                    band.label.clone(),
                    band.rate_percent,
                    self.precision.divide(band.lower_bound, divisor)?,
                    upper_bound,
                ))
            })
            .collect()
    }

    /// Multiplies amounts, tax and bounds by `periods` to express per-period allocations annually
    pub fn annualise(
        &self,
        allocations: Vec<TaxBandAllocation>,
        periods: u32,
    ) -> Vec<TaxBandAllocation> {
        let factor = Decimal::from(periods);
        allocations
            .into_iter()
            .map(|allocation| {
                let band = allocation.band;
                let upper_bound = match band.upper_bound {
                    BandLimit::Bounded(upper) => BandLimit::Bounded(
                        self.precision.round_money(self.precision.multiply(upper, factor)),
                    ),
                    BandLimit::Unbounded => BandLimit::Unbounded,
                };
                TaxBandAllocation {
                    band: TaxBand::new(
                        band.label,
                        band.rate_percent,
                        self.precision
                            .round_money(self.precision.multiply(band.lower_bound, factor)),
                        upper_bound,
                    ),
                    amount_in_band: self.precision.multiply(allocation.amount_in_band, factor),
                    tax_for_band: self.precision.multiply(allocation.tax_for_band, factor),
                }
            })
            .collect()
    }

    /// Rate of the band the last pound of income falls into
    pub fn marginal_rate(&self, income: Decimal, bands: &[TaxBand]) -> Rate {
        self.allocate(income, bands)
            .iter()
            .rev()
            .find(|allocation| allocation.amount_in_band > Decimal::ZERO)
            .map(|allocation| allocation.band.rate())
            .or_else(|| bands.first().map(TaxBand::rate))
            .unwrap_or(Rate::ZERO)
    }
}
