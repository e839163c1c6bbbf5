//! Invoice domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use staydesk_shared::InvoiceConfig;
use staydesk_shared::types::{BookingId, InvoiceId, InvoiceItemId, PaymentId, TenantId, UserId};

use crate::finance::PaymentType;

/// Invoice status.
///
/// Draft → Sent → Paid is the forward path. Void and Cancelled are terminal
/// and release every grouped member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Created, not yet sent.
    Draft,
    /// Sent to the payer.
    Sent,
    /// Settled by the payer.
    Paid,
    /// Voided; kept for the record.
    Void,
    /// Cancelled.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Paid => "PAID",
            Self::Void => "VOID",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "SENT" => Some(Self::Sent),
            "PAID" => Some(Self::Paid),
            "VOID" => Some(Self::Void),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further status change is accepted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Void | Self::Cancelled)
    }

    /// Returns true if entering this status releases the grouped members.
    #[must_use]
    pub const fn releases_members(&self) -> bool {
        self.is_terminal()
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an invoice groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationStrategy {
    /// One item per booking; bookings are flagged `is_invoiced`.
    Bookings,
    /// Settled payments; each payment points at the invoice.
    Payments,
}

impl AggregationStrategy {
    /// Returns the string representation of the strategy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bookings => "BOOKINGS",
            Self::Payments => "PAYMENTS",
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A billable document grouping bookings or payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice id.
    pub id: InvoiceId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Human-readable unique number.
    pub invoice_number: String,
    /// What the invoice groups.
    pub strategy: AggregationStrategy,
    /// Collection direction of booking-grouped invoices.
    pub payment_type: Option<PaymentType>,
    /// Sum of the grouped amounts.
    pub total_amount: Decimal,
    /// Invoice status.
    pub status: InvoiceStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User who created the invoice.
    pub created_by: UserId,
    /// When the invoice was created.
    pub created_at: DateTime<Utc>,
    /// When the invoice was last changed.
    pub updated_at: DateTime<Utc>,
}

/// A booking line of a booking-grouped invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item id.
    pub id: InvoiceItemId,
    /// Invoice the line belongs to.
    pub invoice_id: InvoiceId,
    /// Booking billed.
    pub booking_id: BookingId,
    /// Booking total at invoicing time.
    pub amount: Decimal,
    /// Booking commission at invoicing time; zero when absent.
    pub commission: Decimal,
    /// Booking net revenue at invoicing time.
    pub net_revenue: Decimal,
}

/// An invoice with its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    /// The invoice.
    pub invoice: Invoice,
    /// Lines of a booking-grouped invoice.
    pub items: Vec<InvoiceItem>,
    /// Payments of a payment-grouped invoice.
    pub payment_ids: Vec<PaymentId>,
}

/// Input for invoicing bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFromBookingsInput {
    /// Bookings to group.
    pub booking_ids: Vec<BookingId>,
    /// Collection direction every booking must have.
    pub payment_type: PaymentType,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for invoicing payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFromPaymentsInput {
    /// Payments to group.
    pub payment_ids: Vec<PaymentId>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Filters for listing invoices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceFilter {
    /// Narrow a super admin's listing to one tenant. Ignored for other roles.
    pub tenant_id: Option<TenantId>,
    /// Only invoices in this status.
    pub status: Option<InvoiceStatus>,
    /// Only invoices produced by this strategy.
    pub strategy: Option<AggregationStrategy>,
}

impl InvoiceFilter {
    /// Returns true if the invoice passes every set filter except tenant.
    #[must_use]
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.status.is_none_or(|s| invoice.status == s)
            && self.strategy.is_none_or(|s| invoice.strategy == s)
    }
}

/// Result of cancelling an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The invoice was kept with status `CANCELLED`.
    Cancelled(Invoice),
    /// The invoice row was deleted.
    Deleted(InvoiceId),
}

impl CancelOutcome {
    /// Id of the cancelled invoice.
    #[must_use]
    pub fn invoice_id(&self) -> InvoiceId {
        match self {
            Self::Cancelled(invoice) => invoice.id,
            Self::Deleted(id) => *id,
        }
    }
}

/// Options of the invoice service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceOptions {
    /// Leading token of invoice numbers.
    pub number_prefix: String,
    /// Fresh numbers tried before a collision is reported.
    pub number_attempts: u32,
    /// Length of the random suffix.
    pub suffix_length: usize,
}

impl Default for InvoiceOptions {
    fn default() -> Self {
        Self::from(&InvoiceConfig::default())
    }
}

impl From<&InvoiceConfig> for InvoiceOptions {
    fn from(config: &InvoiceConfig) -> Self {
        Self {
            number_prefix: config.number_prefix.clone(),
            number_attempts: config.number_attempts.max(1),
            suffix_length: config.suffix_length.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(InvoiceStatus::Void.is_terminal());
        assert!(InvoiceStatus::Cancelled.is_terminal());
        assert!(!InvoiceStatus::Paid.is_terminal());
        assert!(!InvoiceStatus::Draft.is_terminal());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(InvoiceStatus::parse("sent"), Some(InvoiceStatus::Sent));
        assert_eq!(InvoiceStatus::parse(" VOID"), Some(InvoiceStatus::Void));
        assert_eq!(InvoiceStatus::parse("archived"), None);
    }

    #[test]
    fn test_options_from_config() {
        let options = InvoiceOptions::default();
        assert_eq!(options.number_prefix, "INV");
        assert_eq!(options.number_attempts, 3);
        assert_eq!(options.suffix_length, 6);

        let config = InvoiceConfig {
            number_prefix: "BILL".to_string(),
            number_attempts: 0,
            suffix_length: 0,
        };
        let options = InvoiceOptions::from(&config);
        assert_eq!(options.number_attempts, 1);
        assert_eq!(options.suffix_length, 1);
    }
}
