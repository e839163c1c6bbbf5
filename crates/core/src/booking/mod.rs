//! Booking lifecycle.
//!
//! # Modules
//!
//! - `types` - Booking entity, stay status, inputs and filters
//! - `validation` - Date, placement, guest and amount rules
//! - `service` - Create, read, list, update and remove
//! - `error` - Booking errors

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::BookingError;
pub use service::BookingService;
pub use types::{
    Booking, BookingFilter, BookingOptions, BookingStatus, CreateBookingInput, UpdateBookingInput,
};
