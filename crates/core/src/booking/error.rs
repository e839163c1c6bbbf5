//! Booking error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use staydesk_shared::AppError;
use staydesk_shared::types::{BookingId, PropertyId, RoomTypeId};

use super::types::BookingStatus;
use crate::access::AccessError;
use crate::finance::FinanceError;
use crate::store::StoreError;

/// Errors that can occur during booking operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Booking not found in the actor's tenant.
    #[error("Booking {0} not found")]
    NotFound(BookingId),

    /// Property not found in the actor's tenant.
    #[error("Property {0} not found")]
    PropertyNotFound(PropertyId),

    /// Room type not found in the actor's tenant.
    #[error("Room type {0} not found")]
    RoomTypeNotFound(RoomTypeId),

    /// Room type is not part of the booked property.
    #[error("Room type {room_type_id} does not belong to property {property_id}")]
    RoomTypeMismatch {
        /// The room type.
        room_type_id: RoomTypeId,
        /// The booked property.
        property_id: PropertyId,
    },

    /// Check-out is not after check-in.
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidDates {
        /// Arrival date.
        check_in: NaiveDate,
        /// Departure date.
        check_out: NaiveDate,
    },

    /// No adult on the booking.
    #[error("At least one adult is required")]
    InvalidGuestCount,

    /// A monetary field is negative.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Name of the field.
        field: &'static str,
    },

    /// Commission is larger than the amount it is taken from.
    #[error("commission {commission} exceeds totalAmount {total_amount}")]
    CommissionExceedsTotal {
        /// Channel commission.
        commission: Decimal,
        /// Gross amount charged.
        total_amount: Decimal,
    },

    /// A derived figure overflowed.
    #[error(transparent)]
    AmountOverflow(#[from] FinanceError),

    /// Guest name missing or blank.
    #[error("guestName is required")]
    GuestNameRequired,

    /// Attempt to move a booking to another tenant's property.
    #[error("Booking cannot be moved to property {0} of another tenant")]
    CrossTenantReassignment(PropertyId),

    /// Status change outside the stay graph.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: BookingStatus,
        /// The attempted status.
        to: BookingStatus,
    },

    /// Booking is covered by an invoice.
    #[error("Booking {0} is invoiced; cancel the invoice first")]
    BookingInvoiced(BookingId),

    /// Booking is covered by an invoice, so its figures and direction are fixed.
    #[error("Booking {0} is invoiced; its amounts and payment type cannot change")]
    InvoicedFiguresFrozen(BookingId),

    /// Booking still has payments recorded against it.
    #[error("Booking {0} has recorded payments")]
    HasPayments(BookingId),

    /// Authorization failure.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::PropertyNotFound(_) | Self::RoomTypeNotFound(_) => 404,

            Self::RoomTypeMismatch { .. }
            | Self::InvalidDates { .. }
            | Self::InvalidGuestCount
            | Self::NegativeAmount { .. }
            | Self::CommissionExceedsTotal { .. }
            | Self::GuestNameRequired
            | Self::CrossTenantReassignment(_)
            | Self::InvalidStatusTransition { .. }
            | Self::BookingInvoiced(_)
            | Self::InvoicedFiguresFrozen(_)
            | Self::HasPayments(_) => 400,

            Self::AmountOverflow(err) => err.status_code(),
            Self::Access(err) => err.status_code(),
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BOOKING_NOT_FOUND",
            Self::PropertyNotFound(_) => "PROPERTY_NOT_FOUND",
            Self::RoomTypeNotFound(_) => "ROOM_TYPE_NOT_FOUND",
            Self::RoomTypeMismatch { .. } => "ROOM_TYPE_MISMATCH",
            Self::InvalidDates { .. } => "INVALID_DATES",
            Self::InvalidGuestCount => "INVALID_GUEST_COUNT",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::CommissionExceedsTotal { .. } => "COMMISSION_EXCEEDS_TOTAL",
            Self::AmountOverflow(err) => err.error_code(),
            Self::GuestNameRequired => "GUEST_NAME_REQUIRED",
            Self::CrossTenantReassignment(_) => "CROSS_TENANT_REASSIGNMENT",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::BookingInvoiced(_) => "BOOKING_INVOICED",
            Self::InvoicedFiguresFrozen(_) => "BOOKING_FIGURES_FROZEN",
            Self::HasPayments(_) => "BOOKING_HAS_PAYMENTS",
            Self::Access(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Access(err) => err.into(),
            BookingError::Store(err) => err.into(),
            other => Self::from_status(other.status_code(), other.to_string()),
        }
    }
}
