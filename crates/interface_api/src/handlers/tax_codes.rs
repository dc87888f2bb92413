//! Tax code and tax year handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain_paye::validate_tax_code;
use validator::Validate;

use crate::dto::tax_codes::*;
use crate::{error::ApiError, AppState};

/// Parses a tax code and reports whether it is well formed
///
/// Malformed codes still get a descriptor, built the same lenient way the
/// calculator reads them.
pub async fn describe_tax_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<TaxYearQuery>,
) -> Result<Json<TaxCodeResponse>, ApiError> {
    query.validate()?;
    let year = state.tax_year(query.tax_year.as_deref())?;
    let descriptor = year.tax_code_parser().parse(&code);
    let validation_error = validate_tax_code(&code).err().map(|e| e.to_string());

    Ok(Json(TaxCodeResponse {
        code: descriptor.code.clone(),
        is_valid: validation_error.is_none(),
        validation_error,
        description: descriptor.describe(),
        descriptor,
    }))
}

/// Lists supported tax years
pub async fn list_tax_years(
    State(state): State<AppState>,
) -> Result<Json<TaxYearsResponse>, ApiError> {
    let default_year = state.tax_year(None)?.code();
    let tax_years = state
        .tax_years
        .iter()
        .map(|year| TaxYearSummary {
            tax_year: year.code(),
            personal_allowance: year.personal_allowance,
            taper_threshold: year.taper_threshold,
            is_default: year.code() == default_year,
        })
        .collect();

    Ok(Json(TaxYearsResponse {
        default_tax_year: default_year,
        tax_years,
    }))
}
