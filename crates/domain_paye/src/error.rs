//! PAYE domain errors
//!
//! This module defines all error types that can occur within the
//! PAYE calculation domain.

use core_kernel::PrecisionError;
use thiserror::Error;

/// Errors that can occur in the PAYE domain
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayeError {
    /// Decimal arithmetic failed
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] PrecisionError),

    /// No rate table is registered for the tax year
    #[error("Unknown tax year: {0}")]
    UnknownTaxYear(String),

    /// Tax code failed syntax validation
    #[error("Invalid tax code: {0}")]
    InvalidTaxCode(String),

    /// A band schedule is not contiguous or not ascending
    #[error("Invalid band schedule: {0}")]
    InvalidSchedule(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl PayeError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PayeError::Validation(message.into())
    }

    /// Creates an invalid tax code error
    pub fn invalid_tax_code(message: impl Into<String>) -> Self {
        PayeError::InvalidTaxCode(message.into())
    }
}
