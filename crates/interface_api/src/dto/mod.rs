//! Request and response bodies

pub mod benefits;
pub mod dates;
pub mod paye;
pub mod salary;
pub mod tax_codes;
