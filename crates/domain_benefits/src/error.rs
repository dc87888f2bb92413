//! Benefits domain errors

use core_kernel::{PrecisionError, TemporalError};
use thiserror::Error;

/// Errors that can occur when valuing a benefit in kind
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BenefitError {
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] PrecisionError),

    #[error("Tax calendar error: {0}")]
    Temporal(#[from] TemporalError),

    /// No car benefit rates are held for the tax year
    #[error("Unsupported tax year for car benefit: {0}")]
    UnsupportedTaxYear(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl BenefitError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BenefitError::Validation(message.into())
    }
}
