//! Input validation rules
//!
//! The calculator itself accepts any input. These checks are for callers
//! that take figures from users.
//!
//! # Validation Rules
//!
//! - Salary must be greater than zero and at most £10,000,000
//! - Tax code must match the HMRC code grammar
//! - Month periods run 1-12, week periods 1-52
//! - Pension contributions are a percentage between 0 and 100

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::PeriodSelector;

use crate::error::PayeError;
use crate::tax_code::validate_tax_code;

/// Highest salary accepted
pub const MAX_SALARY: Decimal = dec!(10000000);

/// Result of validating a set of inputs
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all inputs are valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Records the error from a failed check
    pub fn check(&mut self, outcome: Result<(), PayeError>) {
        if let Err(error) = outcome {
            self.add_error(match error {
                PayeError::Validation(message) => message,
                other => other.to_string(),
            });
        }
    }

    /// Converts into a single error listing every problem
    pub fn into_result(self) -> Result<(), PayeError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(PayeError::validation(self.errors.join("; ")))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Checks an annual salary
pub fn validate_salary(salary: Decimal) -> Result<(), PayeError> {
    if salary.is_zero() {
        return Err(PayeError::validation("Salary must be greater than zero"));
    }
    if salary.is_sign_negative() {
        return Err(PayeError::validation("Salary cannot be negative"));
    }
    if salary > MAX_SALARY {
        return Err(PayeError::validation("Salary exceeds maximum allowed value"));
    }
    Ok(())
}

/// Checks a pay period number
pub fn validate_period_number(period: PeriodSelector) -> Result<(), PayeError> {
    let max = period.max_number();
    if !(1..=max).contains(&period.number()) {
        return Err(PayeError::validation(format!("Period must be between 1 and {}", max)));
    }
    Ok(())
}

/// Checks a pension contribution percentage
pub fn validate_pension_percentage(percentage: Decimal) -> Result<(), PayeError> {
    if percentage.is_sign_negative() && !percentage.is_zero() {
        return Err(PayeError::validation("Percentage cannot be negative"));
    }
    if percentage > dec!(100) {
        return Err(PayeError::validation("Percentage cannot exceed 100%"));
    }
    Ok(())
}

/// Validates everything a PAYE calculation request carries
pub fn validate_calculation_inputs(
    salary: Decimal,
    tax_code: &str,
    period: Option<PeriodSelector>,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    result.check(validate_salary(salary));
    result.check(validate_tax_code(tax_code));
    if let Some(period) = period {
        result.check(validate_period_number(period));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_limits() {
        assert!(validate_salary(dec!(50000)).is_ok());
        assert!(validate_salary(dec!(10000000)).is_ok());
        assert!(validate_salary(Decimal::ZERO).is_err());
        assert!(validate_salary(dec!(-1)).is_err());
        assert!(validate_salary(dec!(10000000.01)).is_err());
    }

    #[test]
    fn test_period_limits() {
        assert!(validate_period_number(PeriodSelector::Month(12)).is_ok());
        assert!(validate_period_number(PeriodSelector::Month(13)).is_err());
        assert!(validate_period_number(PeriodSelector::Week(52)).is_ok());
        assert!(validate_period_number(PeriodSelector::Week(0)).is_err());
    }

    #[test]
    fn test_pension_limits() {
        assert!(validate_pension_percentage(Decimal::ZERO).is_ok());
        assert!(validate_pension_percentage(dec!(100)).is_ok());
        assert!(validate_pension_percentage(dec!(-0.5)).is_err());
        assert!(validate_pension_percentage(dec!(100.1)).is_err());
    }

    #[test]
    fn test_collects_every_error() {
        let result =
            validate_calculation_inputs(Decimal::ZERO, "XYZ", Some(PeriodSelector::Month(0)));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[0], "Salary must be greater than zero");
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_valid_inputs() {
        let result =
            validate_calculation_inputs(dec!(35000), "1257L", Some(PeriodSelector::Week(6)));
        assert!(result.is_valid);
        assert!(result.into_result().is_ok());
    }
}
