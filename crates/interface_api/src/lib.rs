//! HTTP API Layer
//!
//! This crate provides the REST API for the PAYE calculator using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each calculation
//! - **Middleware**: Tracing and request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig, AppState};
//!
//! let state = AppState::new(ApiConfig::default())?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use core_kernel::{Precision, WorkingCalendar};
use domain_benefits::CarBenefitCalculator;
use domain_paye::{PayeCalculator, PayeError, TaxYearConfig, TaxYearTable};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{benefits, dates, health, paye, salary, tax_codes};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub precision: Precision,
    pub tax_years: Arc<TaxYearTable>,
    calculators: Arc<HashMap<String, PayeCalculator>>,
    pub car_benefits: CarBenefitCalculator,
    pub calendar: Arc<WorkingCalendar>,
}

impl AppState {
    /// Builds state over the built-in tax years
    ///
    /// Fails if the configured default tax year is not supported.
    pub fn new(config: ApiConfig) -> Result<Self, PayeError> {
        Self::with_tax_years(config, TaxYearTable::builtin())
    }

    /// Builds state over a custom tax year table
    pub fn with_tax_years(config: ApiConfig, tax_years: TaxYearTable) -> Result<Self, PayeError> {
        tax_years.get(&config.default_tax_year)?;

        let precision = Precision::default();
        let calculators = tax_years
            .iter()
            .map(|year| {
                let calculator = PayeCalculator::new(year.clone(), precision)
                    .with_non_cumulative_method(config.non_cumulative_method);
                (year.code(), calculator)
            })
            .collect();

        Ok(Self {
            config,
            precision,
            tax_years: Arc::new(tax_years),
            calculators: Arc::new(calculators),
            car_benefits: CarBenefitCalculator::new(precision),
            calendar: Arc::new(WorkingCalendar::default()),
        })
    }

    /// Config for the named year, or the default year
    pub fn tax_year(&self, code: Option<&str>) -> Result<&TaxYearConfig, PayeError> {
        self.tax_years
            .get(code.unwrap_or(&self.config.default_tax_year))
    }

    /// Calculator for the named year, or the default year
    pub fn calculator(&self, code: Option<&str>) -> Result<&PayeCalculator, PayeError> {
        let year = self.tax_year(code)?;
        self.calculators
            .get(&year.code())
            .ok_or_else(|| PayeError::UnknownTaxYear(year.code()))
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared calculators and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // PAYE routes
    let paye_routes = Router::new().route("/calculate", post(paye::calculate));

    // Tax code routes
    let tax_code_routes = Router::new().route("/:code", get(tax_codes::describe_tax_code));

    // Salary routes
    let salary_routes = Router::new().route("/convert", post(salary::convert));

    // Benefit routes
    let benefit_routes = Router::new().route("/company-car", post(benefits::company_car));

    // Working-day routes
    let date_routes = Router::new()
        .route("/working-days", post(dates::working_days))
        .route("/add-working-days", post(dates::add_working_days));

    let api_routes = Router::new()
        .nest("/paye", paye_routes)
        .nest("/tax-codes", tax_code_routes)
        .route("/tax-years", get(tax_codes::list_tax_years))
        .nest("/salary", salary_routes)
        .nest("/benefits", benefit_routes)
        .nest("/dates", date_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
