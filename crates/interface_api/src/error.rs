//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::TemporalError;
use domain_benefits::BenefitError;
use domain_paye::PayeError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
        };

        let details = match &self {
            ApiError::Validation(msg) if msg.contains("; ") => {
                Some(msg.split("; ").map(str::to_string).collect())
            }
            _ => None,
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PayeError> for ApiError {
    fn from(err: PayeError) -> Self {
        match err {
            PayeError::UnknownTaxYear(year) => {
                ApiError::NotFound(format!("Unknown tax year: {}", year))
            }
            PayeError::InvalidTaxCode(code) => {
                ApiError::Validation(format!("Invalid tax code: {}", code))
            }
            PayeError::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<BenefitError> for ApiError {
    fn from(err: BenefitError) -> Self {
        match err {
            BenefitError::Validation(msg) => ApiError::Validation(msg),
            BenefitError::UnsupportedTaxYear(_) | BenefitError::Temporal(_) => {
                ApiError::BadRequest(err.to_string())
            }
            BenefitError::Arithmetic(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<TemporalError> for ApiError {
    fn from(err: TemporalError) -> Self {
        match err {
            TemporalError::InvalidDateRange { .. } => ApiError::Validation(err.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
