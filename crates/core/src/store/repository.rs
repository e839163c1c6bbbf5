//! Store traits implemented by persistence collaborators.

use std::future::Future;

use staydesk_shared::types::{
    BookingId, InvoiceId, PaymentId, PropertyId, RoomTypeId, UserId,
};

use super::error::StoreError;
use super::types::{BookingQuery, InvoiceQuery, PaymentQuery};
use crate::access::TenantScope;
use crate::booking::Booking;
use crate::invoice::{Invoice, InvoiceItem};
use crate::payment::Payment;
use crate::tenancy::{Property, RoomType, User};

/// Opens transactions.
///
/// This trait is implemented by the db crate.
pub trait Store: Send + Sync {
    /// Transaction type.
    type Tx: StoreTx;

    /// Begins a transaction.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, StoreError>> + Send;
}

/// A unit of work.
///
/// Reads observe the transaction's own writes. Nothing is visible to other
/// transactions until [`StoreTx::commit`] succeeds; dropping the transaction
/// rolls it back.
pub trait StoreTx: Send {
    /// Find a user by id.
    fn find_user(
        &self,
        scope: TenantScope,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Find a property by id.
    fn find_property(
        &self,
        scope: TenantScope,
        id: PropertyId,
    ) -> impl Future<Output = Result<Option<Property>, StoreError>> + Send;

    /// Find several properties. Missing ids are skipped.
    fn find_properties(
        &self,
        scope: TenantScope,
        ids: &[PropertyId],
    ) -> impl Future<Output = Result<Vec<Property>, StoreError>> + Send;

    /// Find a room type by id.
    fn find_room_type(
        &self,
        scope: TenantScope,
        id: RoomTypeId,
    ) -> impl Future<Output = Result<Option<RoomType>, StoreError>> + Send;

    /// Find a booking by id.
    fn find_booking(
        &self,
        scope: TenantScope,
        id: BookingId,
    ) -> impl Future<Output = Result<Option<Booking>, StoreError>> + Send;

    /// Find several bookings. Missing ids are skipped.
    fn find_bookings(
        &self,
        scope: TenantScope,
        ids: &[BookingId],
    ) -> impl Future<Output = Result<Vec<Booking>, StoreError>> + Send;

    /// List bookings; returns the page and the total match count.
    fn list_bookings(
        &self,
        query: &BookingQuery,
    ) -> impl Future<Output = Result<(Vec<Booking>, u64), StoreError>> + Send;

    /// Find a payment by id.
    fn find_payment(
        &self,
        scope: TenantScope,
        id: PaymentId,
    ) -> impl Future<Output = Result<Option<Payment>, StoreError>> + Send;

    /// Find several payments. Missing ids are skipped.
    fn find_payments(
        &self,
        scope: TenantScope,
        ids: &[PaymentId],
    ) -> impl Future<Output = Result<Vec<Payment>, StoreError>> + Send;

    /// List payments ordered by payment date.
    fn list_payments(
        &self,
        query: &PaymentQuery,
    ) -> impl Future<Output = Result<Vec<Payment>, StoreError>> + Send;

    /// Find an invoice by id.
    fn find_invoice(
        &self,
        scope: TenantScope,
        id: InvoiceId,
    ) -> impl Future<Output = Result<Option<Invoice>, StoreError>> + Send;

    /// List invoices; returns the page and the total match count.
    fn list_invoices(
        &self,
        query: &InvoiceQuery,
    ) -> impl Future<Output = Result<(Vec<Invoice>, u64), StoreError>> + Send;

    /// Items of a booking-grouped invoice.
    fn list_invoice_items(
        &self,
        invoice_id: InvoiceId,
    ) -> impl Future<Output = Result<Vec<InvoiceItem>, StoreError>> + Send;

    /// Insert a booking.
    fn insert_booking(
        &mut self,
        booking: &Booking,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace a stored booking.
    fn update_booking(
        &mut self,
        booking: &Booking,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a booking.
    fn delete_booking(
        &mut self,
        id: BookingId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert a payment.
    fn insert_payment(
        &mut self,
        payment: &Payment,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace a stored payment.
    fn update_payment(
        &mut self,
        payment: &Payment,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a payment.
    fn delete_payment(
        &mut self,
        id: PaymentId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert an invoice.
    ///
    /// Fails with [`StoreError::UniqueViolation`] on a duplicate invoice number.
    fn insert_invoice(
        &mut self,
        invoice: &Invoice,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace a stored invoice.
    fn update_invoice(
        &mut self,
        invoice: &Invoice,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete an invoice and its items.
    fn delete_invoice(
        &mut self,
        id: InvoiceId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert invoice items.
    fn insert_invoice_items(
        &mut self,
        items: &[InvoiceItem],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Set `is_invoiced` on every listed booking.
    fn set_bookings_invoiced(
        &mut self,
        ids: &[BookingId],
        invoiced: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Set `invoice_id` on every listed payment.
    fn set_payments_invoice(
        &mut self,
        ids: &[PaymentId],
        invoice_id: Option<InvoiceId>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Publish every write of the transaction.
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
