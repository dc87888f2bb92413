//! PAYE Domain
//!
//! This crate implements UK Pay As You Earn income tax and employee
//! National Insurance calculations.
//!
//! # Pipeline
//!
//! ```text
//! tax code -> TaxCodeDescriptor -> effective allowance (taper, K codes)
//!          -> band allocation -> National Insurance -> period breakdown
//! ```
//!
//! Every calculation is a pure function of its inputs and the
//! [`TaxYearConfig`] in use; nothing is cached between calls.
//!
//! # Example
//!
//! ```rust
//! use domain_paye::PayeCalculator;
//! use rust_decimal_macros::dec;
//!
//! let calculator = PayeCalculator::default();
//! let result = calculator
//!     .calculate_tax_details(dec!(50000), "1257L", true, None)
//!     .unwrap();
//! assert_eq!(result.annual_summary.total_income_tax, dec!(7486));
//! ```

pub mod amortizer;
pub mod bands;
pub mod calculator;
pub mod error;
pub mod national_insurance;
pub mod salary;
pub mod tax_code;
pub mod tax_year;
pub mod validation;

pub use amortizer::{CalculationBasis, NonCumulativeMethod, PeriodAmortizer, PeriodDetail};
pub use bands::{BandLimit, BandSchedule, TaxBand, TaxBandAllocation, TaxBandEngine};
pub use calculator::{AnnualSummary, PayeCalculator, TaxCalculationResult};
pub use error::PayeError;
pub use national_insurance::NationalInsuranceEngine;
pub use salary::{SalaryBreakdown, SalaryPeriod};
pub use tax_code::{
    parse, validate_tax_code, Allowance, Region, SpecialRate, TaxCodeDescriptor, TaxCodeParser,
};
pub use tax_year::{TaxYearConfig, TaxYearTable, DEFAULT_TAX_YEAR};
