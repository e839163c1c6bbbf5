//! Payment error types.

use chrono::NaiveDate;
use thiserror::Error;

use staydesk_shared::AppError;
use staydesk_shared::types::{BookingId, PaymentId, UserId};

use crate::access::AccessError;
use crate::finance::{PaymentMethod, PaymentType};
use crate::store::StoreError;

/// Errors that can occur while recording payments.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Payment not found in the actor's tenant.
    #[error("Payment {0} not found")]
    NotFound(PaymentId),

    /// Booking not found in the actor's tenant.
    #[error("Booking {0} not found")]
    BookingNotFound(BookingId),

    /// A field required by the collection direction is missing.
    #[error("{field} is required for {payment_type} payments")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
        /// Collection direction of the payment.
        payment_type: PaymentType,
    },

    /// A field belonging to the other collection direction was supplied.
    #[error("{field} is not accepted for {payment_type} payments")]
    FieldNotAllowed {
        /// Name of the field.
        field: &'static str,
        /// Collection direction of the payment.
        payment_type: PaymentType,
    },

    /// Collecting user absent, inactive or in another tenant.
    #[error("Collector {0} not found")]
    CollectorNotFound(UserId),

    /// Method not in the direction's method set.
    #[error("Method {method} is not accepted for {payment_type} payments")]
    MethodNotAllowed {
        /// The method.
        method: PaymentMethod,
        /// Collection direction of the payment.
        payment_type: PaymentType,
    },

    /// Channel remittance dated before the stay ended.
    #[error("Payment date {payment_date} is before check-out {check_out}")]
    PaymentDateBeforeCheckout {
        /// Date of the payment.
        payment_date: NaiveDate,
        /// Check-out of the booking.
        check_out: NaiveDate,
    },

    /// Amount is zero or negative.
    #[error("Payment amount must be positive")]
    NonPositiveAmount,

    /// Payment is grouped into an invoice.
    #[error("Payment {0} is invoiced; cancel the invoice first")]
    PaymentInvoiced(PaymentId),

    /// Authorization failure.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PaymentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::BookingNotFound(_) | Self::CollectorNotFound(_) => 404,

            Self::MissingField { .. }
            | Self::FieldNotAllowed { .. }
            | Self::MethodNotAllowed { .. }
            | Self::PaymentDateBeforeCheckout { .. }
            | Self::NonPositiveAmount
            | Self::PaymentInvoiced(_) => 400,

            Self::Access(err) => err.status_code(),
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "PAYMENT_NOT_FOUND",
            Self::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::FieldNotAllowed { .. } => "FIELD_NOT_ALLOWED",
            Self::CollectorNotFound(_) => "COLLECTOR_NOT_FOUND",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::PaymentDateBeforeCheckout { .. } => "PAYMENT_DATE_BEFORE_CHECKOUT",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::PaymentInvoiced(_) => "PAYMENT_INVOICED",
            Self::Access(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Access(err) => err.into(),
            PaymentError::Store(err) => err.into(),
            other => Self::from_status(other.status_code(), other.to_string()),
        }
    }
}
