//! Payment domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use staydesk_shared::types::{BookingId, InvoiceId, PaymentId, TenantId, UserId};

use crate::finance::{PaymentMethod, PaymentType};

/// Settlement status of a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Announced but not received.
    Pending,
    /// Received; eligible for payment-grouped invoicing.
    #[default]
    Completed,
    /// Attempt failed.
    Failed,
    /// Money returned.
    Refunded,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            "REFUNDED" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Returns true if the money has been received.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money received against a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment id.
    pub id: PaymentId,
    /// Owning tenant; always the booking's tenant.
    pub tenant_id: TenantId,
    /// Booking paid for. Immutable.
    pub booking_id: BookingId,
    /// Collection direction. Immutable.
    pub payment_type: PaymentType,
    /// How the money changed hands.
    pub method: PaymentMethod,
    /// Amount received; strictly positive.
    pub amount: Decimal,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// Settlement status.
    pub status: PaymentStatus,
    /// Desk user who collected it (`HOTEL_COLLECT` only). Immutable.
    pub collected_by_id: Option<UserId>,
    /// Channel that remitted it (`OTA_COLLECT` only). Immutable.
    pub received_from: Option<String>,
    /// Invoice grouping this payment.
    pub invoice_id: Option<InvoiceId>,
    /// External reference (transaction id, cheque number).
    pub reference: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User who recorded the payment.
    pub created_by: UserId,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
    /// When the payment was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Returns true if a payment-grouped invoice covers this payment.
    #[must_use]
    pub fn is_invoiced(&self) -> bool {
        self.invoice_id.is_some()
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentInput {
    /// Booking paid for.
    pub booking_id: BookingId,
    /// Collection direction.
    pub payment_type: PaymentType,
    /// How the money changed hands.
    pub method: PaymentMethod,
    /// Amount received.
    pub amount: Decimal,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// Settlement status; `COMPLETED` when absent.
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    /// Desk user who collected it.
    #[serde(default)]
    pub collected_by_id: Option<UserId>,
    /// Channel that remitted it.
    #[serde(default)]
    pub received_from: Option<String>,
    /// External reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Patch for a recorded payment.
///
/// Booking, direction, collector and channel are fixed at creation and have
/// no field here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePaymentInput {
    /// How the money changed hands.
    pub method: Option<PaymentMethod>,
    /// Amount received.
    pub amount: Option<Decimal>,
    /// Date the money was received.
    pub payment_date: Option<NaiveDate>,
    /// Settlement status.
    pub status: Option<PaymentStatus>,
    /// External reference.
    pub reference: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_completed_is_settled() {
        assert!(PaymentStatus::Completed.is_settled());
        assert!(!PaymentStatus::Pending.is_settled());
        assert!(!PaymentStatus::Failed.is_settled());
        assert!(!PaymentStatus::Refunded.is_settled());
    }

    #[test]
    fn test_default_status() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Completed);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(PaymentStatus::parse("refunded"), Some(PaymentStatus::Refunded));
        assert_eq!(PaymentStatus::parse("settled"), None);
    }

    #[test]
    fn test_update_input_deserializes_partially() {
        let patch: UpdatePaymentInput = serde_json::from_str(r#"{"amount":"12.50"}"#).unwrap();
        assert_eq!(patch.amount, Some(Decimal::new(1250, 2)));
        assert!(patch.payment_date.is_none());
    }
}
