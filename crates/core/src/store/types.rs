//! List queries understood by a store.

use staydesk_shared::types::{BookingId, InvoiceId, PageRequest};

use crate::access::{ListScope, TenantScope};
use crate::booking::BookingFilter;
use crate::invoice::InvoiceFilter;
use crate::payment::PaymentStatus;

/// Paginated booking listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingQuery {
    /// Visibility of the caller. An owner restricts the listing to
    /// bookings on properties that user owns.
    pub scope: ListScope,
    /// Field filters.
    pub filter: BookingFilter,
    /// Requested page.
    pub page: PageRequest,
}

/// Unpaginated payment listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentQuery {
    /// Tenants visible to the caller.
    pub scope: TenantScope,
    /// Only payments of this booking.
    pub booking_id: Option<BookingId>,
    /// Only payments grouped into this invoice.
    pub invoice_id: Option<InvoiceId>,
    /// Only payments in this status.
    pub status: Option<PaymentStatus>,
}

impl PaymentQuery {
    /// Every payment visible in `scope`.
    #[must_use]
    pub fn new(scope: TenantScope) -> Self {
        Self {
            scope,
            booking_id: None,
            invoice_id: None,
            status: None,
        }
    }

    /// Narrows to one booking.
    #[must_use]
    pub fn for_booking(mut self, booking_id: BookingId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    /// Narrows to one invoice.
    #[must_use]
    pub fn for_invoice(mut self, invoice_id: InvoiceId) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }
}

/// Paginated invoice listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceQuery {
    /// Visibility of the caller. An owner restricts the listing to invoices
    /// whose every reachable property that user owns.
    pub scope: ListScope,
    /// Field filters.
    pub filter: InvoiceFilter,
    /// Requested page.
    pub page: PageRequest,
}
