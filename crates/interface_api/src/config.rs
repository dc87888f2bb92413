//! API configuration

use domain_paye::{NonCumulativeMethod, DEFAULT_TAX_YEAR};
use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Tax year used when a request does not name one
    pub default_tax_year: String,
    /// How non-cumulative codes are taxed per period
    pub non_cumulative_method: NonCumulativeMethod,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            default_tax_year: DEFAULT_TAX_YEAR.to_string(),
            non_cumulative_method: NonCumulativeMethod::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("log_level", "info")?
            .set_default("default_tax_year", DEFAULT_TAX_YEAR)?
            .set_default("non_cumulative_method", "banded")?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
