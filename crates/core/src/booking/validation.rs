//! Booking validation rules.
//!
//! Rules are checked against the complete candidate booking, so creates and
//! patched updates go through the same path.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BookingError;
use super::types::Booking;
use crate::tenancy::{Property, RoomType};

/// Check-out must fall strictly after check-in.
///
/// # Errors
///
/// Returns [`BookingError::InvalidDates`] otherwise.
pub fn validate_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), BookingError> {
    if check_out > check_in {
        Ok(())
    } else {
        Err(BookingError::InvalidDates {
            check_in,
            check_out,
        })
    }
}

/// The room type must belong to the property, within the same tenant.
///
/// # Errors
///
/// Returns [`BookingError::RoomTypeMismatch`] otherwise.
pub fn validate_placement(room_type: &RoomType, property: &Property) -> Result<(), BookingError> {
    if room_type.belongs_to(property) {
        Ok(())
    } else {
        Err(BookingError::RoomTypeMismatch {
            room_type_id: room_type.id,
            property_id: property.id,
        })
    }
}

/// Monetary inputs must not be negative, and commission cannot exceed the
/// total it is taken from.
///
/// # Errors
///
/// Returns [`BookingError::NegativeAmount`] naming the first offending field,
/// or [`BookingError::CommissionExceedsTotal`].
pub fn validate_amounts(
    total_amount: Decimal,
    commission: Option<Decimal>,
    amount_paid: Decimal,
) -> Result<(), BookingError> {
    let fields = [
        ("totalAmount", Some(total_amount)),
        ("commission", commission),
        ("amountPaid", Some(amount_paid)),
    ];
    for (field, value) in fields {
        if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
            return Err(BookingError::NegativeAmount { field });
        }
    }
    match commission {
        Some(commission) if commission > total_amount => {
            Err(BookingError::CommissionExceedsTotal {
                commission,
                total_amount,
            })
        }
        _ => Ok(()),
    }
}

/// Validates every field-level rule of a candidate booking.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_booking(booking: &Booking) -> Result<(), BookingError> {
    if booking.guest_name.trim().is_empty() {
        return Err(BookingError::GuestNameRequired);
    }
    if booking.adults == 0 {
        return Err(BookingError::InvalidGuestCount);
    }
    validate_dates(booking.check_in, booking.check_out)?;
    validate_amounts(
        booking.total_amount,
        booking.commission,
        booking.amount_paid,
    )
}
