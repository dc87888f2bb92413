//! Request handlers

pub mod benefits;
pub mod dates;
pub mod health;
pub mod paye;
pub mod salary;
pub mod tax_codes;
