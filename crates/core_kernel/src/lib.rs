//! Core Kernel - Foundational types and utilities for the PAYE calculators
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Precise decimal arithmetic with an explicit rounding configuration
//! - Percentage rates and GBP formatting
//! - The UK tax calendar (tax years, tax months and tax weeks)
//! - Working-day counting around weekends and bank holidays

pub mod precision;
pub mod money;
pub mod temporal;

pub use precision::{Precision, PrecisionConfig, PrecisionError};
pub use money::{Rate, format_gbp};
pub use temporal::{TaxYear, TaxMonth, PeriodSelector, TemporalError, WorkingCalendar};
