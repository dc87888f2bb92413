//! Tax year rate tables
//!
//! Each supported year is described by a [`TaxYearConfig`] holding the
//! personal allowance rules, per-region band schedules and flat rates, and
//! the employee National Insurance thresholds. [`TaxYearTable`] keys the
//! configs by year code (`2024-25`).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::TaxYear;

use crate::bands::BandSchedule;
use crate::error::PayeError;
use crate::tax_code::{Region, SpecialRate, TaxCodeParser};

/// Year code used when the caller does not name one
pub const DEFAULT_TAX_YEAR: &str = "2024-25";

/// Rates applied by the flat special codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRates {
    /// BR
    pub basic: Decimal,
    /// D0
    pub higher: Decimal,
    /// D1
    pub additional: Decimal,
}

impl FlatRates {
    /// Rate charged by a flat special code, as a percentage
    pub fn rate_for(&self, special: SpecialRate) -> Decimal {
        match special {
            SpecialRate::BR => self.basic,
            SpecialRate::D0 => self.higher,
            SpecialRate::D1 => self.additional,
            SpecialRate::NT | SpecialRate::ZeroT => Decimal::ZERO,
        }
    }
}

/// Band schedule and flat rates for one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalRates {
    pub schedule: BandSchedule,
    pub flat_rates: FlatRates,
}

/// Employee (Class 1 primary) National Insurance parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalInsuranceConfig {
    /// Annual primary threshold
    pub primary_threshold: Decimal,
    /// Annual upper earnings limit
    pub upper_earnings_limit: Decimal,
    /// Percentage charged between the thresholds
    pub main_rate: Decimal,
    /// Percentage charged above the upper earnings limit
    pub higher_rate: Decimal,
}

/// Rates and thresholds for a tax year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: TaxYear,
    /// Standard personal allowance
    pub personal_allowance: Decimal,
    /// Income above which the allowance is tapered
    pub taper_threshold: Decimal,
    /// Marriage allowance transfer
    pub marriage_allowance: Decimal,
    pub uk: RegionalRates,
    pub scotland: RegionalRates,
    pub national_insurance: NationalInsuranceConfig,
}

impl TaxYearConfig {
    /// 2024/25 rates
    pub fn year_2024_25() -> Self {
        Self {
            tax_year: TaxYear(2024),
            personal_allowance: dec!(12570),
            taper_threshold: dec!(100000),
            marriage_allowance: dec!(1260),
            uk: uk_rates(),
            scotland: RegionalRates {
                schedule: BandSchedule::from_thresholds(&[
                    ("Personal Allowance", dec!(0), Some(dec!(12570))),
                    ("Starter Rate", dec!(19), Some(dec!(14732))),
                    ("Basic Rate", dec!(20), Some(dec!(25688))),
                    ("Intermediate Rate", dec!(21), Some(dec!(43662))),
                    ("Higher Rate", dec!(42), Some(dec!(125140))),
                    ("Top Rate", dec!(47), None),
                ]),
                flat_rates: FlatRates {
                    basic: dec!(20),
                    higher: dec!(21),
                    additional: dec!(42),
                },
            },
            national_insurance: employee_ni(),
        }
    }

    /// 2025/26 rates
    pub fn year_2025_26() -> Self {
        Self {
            tax_year: TaxYear(2025),
            personal_allowance: dec!(12570),
            taper_threshold: dec!(100000),
            marriage_allowance: dec!(1260),
            uk: uk_rates(),
            scotland: RegionalRates {
                schedule: BandSchedule::from_thresholds(&[
                    ("Personal Allowance", dec!(0), Some(dec!(12570))),
                    ("Starter Rate", dec!(19), Some(dec!(15397))),
                    ("Basic Rate", dec!(20), Some(dec!(27491))),
                    ("Intermediate Rate", dec!(21), Some(dec!(43662))),
                    ("Higher Rate", dec!(42), Some(dec!(75000))),
                    ("Advanced Rate", dec!(45), Some(dec!(125140))),
                    ("Top Rate", dec!(48), None),
                ]),
                flat_rates: FlatRates {
                    basic: dec!(20),
                    higher: dec!(21),
                    additional: dec!(42),
                },
            },
            national_insurance: employee_ni(),
        }
    }

    /// Year code, e.g. `2024-25`
    pub fn code(&self) -> String {
        self.tax_year.code()
    }

    /// Rates for a region; Wales uses the UK rates
    pub fn rates_for(&self, region: Region) -> &RegionalRates {
        match region {
            Region::Scotland => &self.scotland,
            Region::Uk | Region::Wales => &self.uk,
        }
    }

    /// Tax code parser using this year's defaults
    pub fn tax_code_parser(&self) -> TaxCodeParser {
        TaxCodeParser::new(self.personal_allowance, self.marriage_allowance)
    }

    /// Checks every band schedule
    pub fn validate(&self) -> Result<(), PayeError> {
        self.uk.schedule.validate()?;
        self.scotland.schedule.validate()?;
        let ni = &self.national_insurance;
        if ni.upper_earnings_limit < ni.primary_threshold {
            return Err(PayeError::InvalidSchedule(format!(
                "{}: NI upper earnings limit is below the primary threshold",
                self.code()
            )));
        }
        Ok(())
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::year_2024_25()
    }
}

fn uk_rates() -> RegionalRates {
    RegionalRates {
        schedule: BandSchedule::from_thresholds(&[
            ("Personal Allowance", dec!(0), Some(dec!(12570))),
            ("Basic Rate", dec!(20), Some(dec!(50270))),
            ("Higher Rate", dec!(40), Some(dec!(125140))),
            ("Additional Rate", dec!(45), None),
        ]),
        flat_rates: FlatRates {
            basic: dec!(20),
            higher: dec!(40),
            additional: dec!(45),
        },
    }
}

fn employee_ni() -> NationalInsuranceConfig {
    NationalInsuranceConfig {
        primary_threshold: dec!(12570),
        upper_earnings_limit: dec!(50270),
        main_rate: dec!(8),
        higher_rate: dec!(2),
    }
}

/// Registry of tax year configs keyed by year code
#[derive(Debug, Clone)]
pub struct TaxYearTable {
    years: BTreeMap<String, TaxYearConfig>,
}

impl TaxYearTable {
    /// An empty table
    pub fn new() -> Self {
        Self {
            years: BTreeMap::new(),
        }
    }

    /// The built-in years
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for config in [TaxYearConfig::year_2024_25(), TaxYearConfig::year_2025_26()] {
            table.years.insert(config.code(), config);
        }
        table
    }

    /// Adds or replaces a year after validating it
    pub fn insert(&mut self, config: TaxYearConfig) -> Result<(), PayeError> {
        config.validate()?;
        self.years.insert(config.code(), config);
        Ok(())
    }

    /// Looks up a year by code; accepts `2024-25`, `2024/25` or `2024`
    pub fn get(&self, code: &str) -> Result<&TaxYearConfig, PayeError> {
        let year: TaxYear = code
            .parse()
            .map_err(|_| PayeError::UnknownTaxYear(code.to_string()))?;
        self.years
            .get(&year.code())
            .ok_or_else(|| PayeError::UnknownTaxYear(code.to_string()))
    }

    /// Supported year codes in ascending order
    pub fn codes(&self) -> Vec<String> {
        self.years.keys().cloned().collect()
    }

    /// Iterates the configs in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = &TaxYearConfig> {
        self.years.values()
    }
}

impl Default for TaxYearTable {
    fn default() -> Self {
        Self::builtin()
    }
}
