//! Benefits in Kind Domain
//!
//! Values taxable benefits provided by an employer. Currently covers
//! company cars: the appropriate percentage from CO2 emissions or electric
//! range, the cash equivalent after capital contributions and part-year
//! availability, and the car fuel benefit.

pub mod company_car;
pub mod error;

pub use company_car::{CarBenefitCalculator, CompanyCarBenefit, CompanyCarParams, FuelType};
pub use error::BenefitError;
