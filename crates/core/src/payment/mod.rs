//! Payment recording.
//!
//! # Modules
//!
//! - `types` - Payment entity, settlement status and inputs
//! - `validation` - Direction-specific field, method, amount and date rules
//! - `service` - Create, read, list, update and remove
//! - `error` - Payment errors

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

pub use error::PaymentError;
pub use service::PaymentService;
pub use types::{CreatePaymentInput, Payment, PaymentStatus, UpdatePaymentInput};
