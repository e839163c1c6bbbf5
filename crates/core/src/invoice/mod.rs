//! Invoice aggregation.
//!
//! Two strategies coexist behind [`InvoiceAggregator`]: booking-grouped
//! invoices (`AggregateByBookings`, the default for new call sites) and
//! payment-grouped invoices (`AggregateByPayments`). Cancelling an invoice
//! is the exact inverse of creating it.
//!
//! # Modules
//!
//! - `types` - Invoice, items, status and inputs
//! - `aggregation` - Eligibility and totals per strategy
//! - `status` - Status change and cancellation rules
//! - `number` - Invoice number generation
//! - `service` - Create, read, list, status update and cancel
//! - `error` - Invoice errors

pub mod aggregation;
pub mod error;
pub mod number;
pub mod service;
pub mod status;
pub mod types;

#[cfg(test)]
mod aggregation_props;

pub use aggregation::{AggregateByBookings, AggregateByPayments, InvoiceAggregator};
pub use error::InvoiceError;
pub use number::{InvoiceNumberGenerator, RandomNumberGenerator};
pub use service::InvoiceService;
pub use types::{
    AggregationStrategy, CancelOutcome, CreateFromBookingsInput, CreateFromPaymentsInput,
    Invoice, InvoiceDetails, InvoiceFilter, InvoiceItem, InvoiceOptions, InvoiceStatus,
};
