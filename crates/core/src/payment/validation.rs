//! Payment validation rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use staydesk_shared::types::UserId;

use super::error::PaymentError;
use crate::finance::{PaymentMethod, PaymentType};

/// Amounts must be strictly positive.
///
/// # Errors
///
/// Returns [`PaymentError::NonPositiveAmount`] otherwise.
pub fn validate_amount(amount: Decimal) -> Result<(), PaymentError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(PaymentError::NonPositiveAmount)
    }
}

/// The method must belong to the direction's method set.
///
/// # Errors
///
/// Returns [`PaymentError::MethodNotAllowed`] otherwise.
pub fn validate_method(method: PaymentMethod, payment_type: PaymentType) -> Result<(), PaymentError> {
    if method.is_allowed_for(payment_type) {
        Ok(())
    } else {
        Err(PaymentError::MethodNotAllowed {
            method,
            payment_type,
        })
    }
}

/// A channel remits only once the stay is over.
///
/// Hotel-collected payments have no date constraint.
///
/// # Errors
///
/// Returns [`PaymentError::PaymentDateBeforeCheckout`] for a channel payment
/// dated before check-out.
pub fn validate_payment_date(
    payment_type: PaymentType,
    payment_date: NaiveDate,
    check_out: NaiveDate,
) -> Result<(), PaymentError> {
    if payment_type.is_channel_collected() && payment_date < check_out {
        return Err(PaymentError::PaymentDateBeforeCheckout {
            payment_date,
            check_out,
        });
    }
    Ok(())
}

/// Collector and channel fields must match the collection direction.
///
/// Returns the collector to look up for hotel-collected payments.
///
/// # Errors
///
/// Returns [`PaymentError::MissingField`] when the direction's field is
/// absent or blank and [`PaymentError::FieldNotAllowed`] when the other
/// direction's field is supplied.
pub fn validate_direction_fields(
    payment_type: PaymentType,
    collected_by_id: Option<UserId>,
    received_from: Option<&str>,
) -> Result<Option<UserId>, PaymentError> {
    let received_from = received_from.map(str::trim).filter(|s| !s.is_empty());
    match payment_type {
        PaymentType::HotelCollect => {
            let collector = collected_by_id.ok_or(PaymentError::MissingField {
                field: "collectedById",
                payment_type,
            })?;
            if received_from.is_some() {
                return Err(PaymentError::FieldNotAllowed {
                    field: "receivedFrom",
                    payment_type,
                });
            }
            Ok(Some(collector))
        }
        PaymentType::OtaCollect => {
            if received_from.is_none() {
                return Err(PaymentError::MissingField {
                    field: "receivedFrom",
                    payment_type,
                });
            }
            if collected_by_id.is_some() {
                return Err(PaymentError::FieldNotAllowed {
                    field: "collectedById",
                    payment_type,
                });
            }
            Ok(None)
        }
    }
}
