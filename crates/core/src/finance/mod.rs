//! Financial derivation for bookings and invoices.
//!
//! All money is `rust_decimal::Decimal`; no floats, no implicit rounding.
//!
//! # Modules
//!
//! - `types` - Collection direction, payment methods and derived booking figures
//! - `calculator` - Pure derivation functions (nights, net revenue, outstanding balance)
//! - `error` - Overflow of derived figures

pub mod calculator;
pub mod error;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::FinancialCalculator;
pub use error::FinanceError;
pub use types::{BookingFigures, FinancialInputs, PaymentMethod, PaymentType};
