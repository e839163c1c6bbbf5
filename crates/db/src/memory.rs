//! Transactional in-memory store.
//!
//! Transactions are serialized: [`MemoryStore::begin`] takes an exclusive
//! lock held until the transaction commits or is dropped. Writes go to a
//! private working copy that replaces the published tables on commit, so a
//! dropped transaction leaves no trace.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use staydesk_core::access::TenantScope;
use staydesk_core::booking::Booking;
use staydesk_core::invoice::{AggregationStrategy, Invoice, InvoiceItem};
use staydesk_core::payment::Payment;
use staydesk_core::store::error::INVOICE_NUMBER_CONSTRAINT;
use staydesk_core::store::{BookingQuery, InvoiceQuery, PaymentQuery, Store, StoreError, StoreTx};
use staydesk_core::tenancy::{Property, RoomType, Tenant, User};
use staydesk_shared::types::{
    BookingId, InvoiceId, PaymentId, PropertyId, RoomTypeId, TenantId, UserId,
};

/// A write at which a one-shot failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// `insert_booking`
    InsertBooking,
    /// `update_booking`
    UpdateBooking,
    /// `delete_booking`
    DeleteBooking,
    /// `insert_payment`
    InsertPayment,
    /// `update_payment`
    UpdatePayment,
    /// `delete_payment`
    DeletePayment,
    /// `insert_invoice`
    InsertInvoice,
    /// `update_invoice`
    UpdateInvoice,
    /// `delete_invoice`
    DeleteInvoice,
    /// `insert_invoice_items`
    InsertInvoiceItems,
    /// `set_bookings_invoiced`
    SetBookingsInvoiced,
    /// `set_payments_invoice`
    SetPaymentsInvoice,
    /// `commit`
    Commit,
}

impl FailPoint {
    /// Returns the name of the write.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InsertBooking => "insert_booking",
            Self::UpdateBooking => "update_booking",
            Self::DeleteBooking => "delete_booking",
            Self::InsertPayment => "insert_payment",
            Self::UpdatePayment => "update_payment",
            Self::DeletePayment => "delete_payment",
            Self::InsertInvoice => "insert_invoice",
            Self::UpdateInvoice => "update_invoice",
            Self::DeleteInvoice => "delete_invoice",
            Self::InsertInvoiceItems => "insert_invoice_items",
            Self::SetBookingsInvoiced => "set_bookings_invoiced",
            Self::SetPaymentsInvoice => "set_payments_invoice",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for FailPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    tenants: HashMap<TenantId, Tenant>,
    users: HashMap<UserId, User>,
    properties: HashMap<PropertyId, Property>,
    room_types: HashMap<RoomTypeId, RoomType>,
    bookings: HashMap<BookingId, Booking>,
    payments: HashMap<PaymentId, Payment>,
    invoices: HashMap<InvoiceId, Invoice>,
    invoice_items: Vec<InvoiceItem>,
}

impl Tables {
    /// Properties reached by an invoice's members.
    fn invoice_properties(&self, invoice: &Invoice) -> BTreeSet<PropertyId> {
        let booking_ids: Vec<BookingId> = match invoice.strategy {
            AggregationStrategy::Bookings => self
                .invoice_items
                .iter()
                .filter(|item| item.invoice_id == invoice.id)
                .map(|item| item.booking_id)
                .collect(),
            AggregationStrategy::Payments => self
                .payments
                .values()
                .filter(|p| p.invoice_id == Some(invoice.id))
                .map(|p| p.booking_id)
                .collect(),
        };
        booking_ids
            .iter()
            .filter_map(|id| self.bookings.get(id))
            .map(|b| b.property_id)
            .collect()
    }

    fn owns_property(&self, owner: UserId, property_id: PropertyId) -> bool {
        self.properties
            .get(&property_id)
            .is_some_and(|p| p.is_owned_by(owner))
    }
}

#[derive(Debug, Default)]
struct Shared {
    tables: Tables,
    fail_point: Option<FailPoint>,
}

/// In-memory implementation of [`Store`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot failure at `point`.
    ///
    /// The next transaction reaching that write fails with a backend error;
    /// the point is disarmed once it fires.
    pub async fn fail_at(&self, point: FailPoint) {
        self.shared.lock().await.fail_point = Some(point);
    }

    /// Seed a tenant.
    pub async fn insert_tenant(&self, tenant: Tenant) {
        self.shared.lock().await.tables.tenants.insert(tenant.id, tenant);
    }

    /// Seed a user.
    pub async fn insert_user(&self, user: User) {
        self.shared.lock().await.tables.users.insert(user.id, user);
    }

    /// Seed a property.
    pub async fn insert_property(&self, property: Property) {
        self.shared
            .lock()
            .await
            .tables
            .properties
            .insert(property.id, property);
    }

    /// Seed a room type.
    pub async fn insert_room_type(&self, room_type: RoomType) {
        self.shared
            .lock()
            .await
            .tables
            .room_types
            .insert(room_type.id, room_type);
    }

    /// A seeded tenant.
    pub async fn tenant(&self, id: TenantId) -> Option<Tenant> {
        self.shared.lock().await.tables.tenants.get(&id).cloned()
    }

    /// Committed state of a booking.
    pub async fn booking(&self, id: BookingId) -> Option<Booking> {
        self.shared.lock().await.tables.bookings.get(&id).cloned()
    }

    /// Committed state of a payment.
    pub async fn payment(&self, id: PaymentId) -> Option<Payment> {
        self.shared.lock().await.tables.payments.get(&id).cloned()
    }

    /// Committed state of an invoice.
    pub async fn invoice(&self, id: InvoiceId) -> Option<Invoice> {
        self.shared.lock().await.tables.invoices.get(&id).cloned()
    }

    /// Committed items of an invoice.
    pub async fn invoice_items(&self, invoice_id: InvoiceId) -> Vec<InvoiceItem> {
        self.shared
            .lock()
            .await
            .tables
            .invoice_items
            .iter()
            .filter(|item| item.invoice_id == invoice_id)
            .cloned()
            .collect()
    }

    /// Number of committed invoices across all tenants.
    pub async fn invoice_count(&self) -> usize {
        self.shared.lock().await.tables.invoices.len()
    }

    /// Number of committed bookings across all tenants.
    pub async fn booking_count(&self) -> usize {
        self.shared.lock().await.tables.bookings.len()
    }
}

impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let guard = Arc::clone(&self.shared).lock_owned().await;
        let working = guard.tables.clone();
        Ok(MemoryTx { guard, working })
    }
}

/// A transaction over a [`MemoryStore`].
pub struct MemoryTx {
    guard: OwnedMutexGuard<Shared>,
    working: Tables,
}

impl fmt::Debug for MemoryTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTx").finish_non_exhaustive()
    }
}

impl MemoryTx {
    /// Fires the armed failure if it matches `point`.
    fn trip(&mut self, point: FailPoint) -> Result<(), StoreError> {
        if self.guard.fail_point.take_if(|armed| *armed == point).is_some() {
            warn!(fail_point = %point, "Injected store failure");
            return Err(StoreError::Backend(format!("injected failure at {point}")));
        }
        Ok(())
    }
}

fn missing(table: &str, id: impl fmt::Display) -> StoreError {
    StoreError::Backend(format!("{table} row {id} does not exist"))
}

fn page<T>(mut rows: Vec<T>, offset: usize, limit: usize) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let rows = if offset >= rows.len() {
        Vec::new()
    } else {
        rows.drain(offset..).take(limit).collect()
    };
    (rows, total)
}

impl StoreTx for MemoryTx {
    async fn find_user(&self, scope: TenantScope, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self
            .working
            .users
            .get(&id)
            .filter(|u| u.tenant_id.is_some_and(|t| scope.contains(t)))
            .cloned())
    }

    async fn find_property(
        &self,
        scope: TenantScope,
        id: PropertyId,
    ) -> Result<Option<Property>, StoreError> {
        Ok(self
            .working
            .properties
            .get(&id)
            .filter(|p| scope.contains(p.tenant_id))
            .cloned())
    }

    async fn find_properties(
        &self,
        scope: TenantScope,
        ids: &[PropertyId],
    ) -> Result<Vec<Property>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.working.properties.get(id))
            .filter(|p| scope.contains(p.tenant_id))
            .cloned()
            .collect())
    }

    async fn find_room_type(
        &self,
        scope: TenantScope,
        id: RoomTypeId,
    ) -> Result<Option<RoomType>, StoreError> {
        Ok(self
            .working
            .room_types
            .get(&id)
            .filter(|r| scope.contains(r.tenant_id))
            .cloned())
    }

    async fn find_booking(
        &self,
        scope: TenantScope,
        id: BookingId,
    ) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .working
            .bookings
            .get(&id)
            .filter(|b| scope.contains(b.tenant_id))
            .cloned())
    }

    async fn find_bookings(
        &self,
        scope: TenantScope,
        ids: &[BookingId],
    ) -> Result<Vec<Booking>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.working.bookings.get(id))
            .filter(|b| scope.contains(b.tenant_id))
            .cloned()
            .collect())
    }

    async fn list_bookings(&self, query: &BookingQuery) -> Result<(Vec<Booking>, u64), StoreError> {
        let mut rows: Vec<Booking> = self
            .working
            .bookings
            .values()
            .filter(|b| query.scope.tenant.contains(b.tenant_id))
            .filter(|b| {
                query
                    .scope
                    .owner
                    .is_none_or(|owner| self.working.owns_property(owner, b.property_id))
            })
            .filter(|b| query.filter.matches(b))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.check_in.cmp(&b.check_in).then(a.id.cmp(&b.id)));
        Ok(page(rows, query.page.offset(), query.page.limit()))
    }

    async fn find_payment(
        &self,
        scope: TenantScope,
        id: PaymentId,
    ) -> Result<Option<Payment>, StoreError> {
        Ok(self
            .working
            .payments
            .get(&id)
            .filter(|p| scope.contains(p.tenant_id))
            .cloned())
    }

    async fn find_payments(
        &self,
        scope: TenantScope,
        ids: &[PaymentId],
    ) -> Result<Vec<Payment>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.working.payments.get(id))
            .filter(|p| scope.contains(p.tenant_id))
            .cloned()
            .collect())
    }

    async fn list_payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>, StoreError> {
        let mut rows: Vec<Payment> = self
            .working
            .payments
            .values()
            .filter(|p| query.scope.contains(p.tenant_id))
            .filter(|p| query.booking_id.is_none_or(|id| p.booking_id == id))
            .filter(|p| query.invoice_id.is_none_or(|id| p.invoice_id == Some(id)))
            .filter(|p| query.status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.payment_date
                .cmp(&b.payment_date)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn find_invoice(
        &self,
        scope: TenantScope,
        id: InvoiceId,
    ) -> Result<Option<Invoice>, StoreError> {
        Ok(self
            .working
            .invoices
            .get(&id)
            .filter(|i| scope.contains(i.tenant_id))
            .cloned())
    }

    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<(Vec<Invoice>, u64), StoreError> {
        let mut rows: Vec<Invoice> = self
            .working
            .invoices
            .values()
            .filter(|i| query.scope.tenant.contains(i.tenant_id))
            .filter(|i| {
                query.scope.owner.is_none_or(|owner| {
                    let properties = self.working.invoice_properties(i);
                    !properties.is_empty()
                        && properties
                            .iter()
                            .all(|id| self.working.owns_property(owner, *id))
                })
            })
            .filter(|i| query.filter.matches(i))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(rows, query.page.offset(), query.page.limit()))
    }

    async fn list_invoice_items(&self, invoice_id: InvoiceId) -> Result<Vec<InvoiceItem>, StoreError> {
        Ok(self
            .working
            .invoice_items
            .iter()
            .filter(|item| item.invoice_id == invoice_id)
            .cloned()
            .collect())
    }

    async fn insert_booking(&mut self, booking: &Booking) -> Result<(), StoreError> {
        self.trip(FailPoint::InsertBooking)?;
        if self.working.bookings.contains_key(&booking.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "bookings_pkey".to_string(),
            });
        }
        self.working.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update_booking(&mut self, booking: &Booking) -> Result<(), StoreError> {
        self.trip(FailPoint::UpdateBooking)?;
        let row = self
            .working
            .bookings
            .get_mut(&booking.id)
            .ok_or_else(|| missing("bookings", booking.id))?;
        *row = booking.clone();
        Ok(())
    }

    async fn delete_booking(&mut self, id: BookingId) -> Result<(), StoreError> {
        self.trip(FailPoint::DeleteBooking)?;
        self.working
            .bookings
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("bookings", id))
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        self.trip(FailPoint::InsertPayment)?;
        if self.working.payments.contains_key(&payment.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "payments_pkey".to_string(),
            });
        }
        self.working.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn update_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        self.trip(FailPoint::UpdatePayment)?;
        let row = self
            .working
            .payments
            .get_mut(&payment.id)
            .ok_or_else(|| missing("payments", payment.id))?;
        *row = payment.clone();
        Ok(())
    }

    async fn delete_payment(&mut self, id: PaymentId) -> Result<(), StoreError> {
        self.trip(FailPoint::DeletePayment)?;
        self.working
            .payments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("payments", id))
    }

    async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<(), StoreError> {
        self.trip(FailPoint::InsertInvoice)?;
        if self
            .working
            .invoices
            .values()
            .any(|i| i.invoice_number == invoice.invoice_number)
        {
            return Err(StoreError::UniqueViolation {
                constraint: INVOICE_NUMBER_CONSTRAINT.to_string(),
            });
        }
        self.working.invoices.insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn update_invoice(&mut self, invoice: &Invoice) -> Result<(), StoreError> {
        self.trip(FailPoint::UpdateInvoice)?;
        let row = self
            .working
            .invoices
            .get_mut(&invoice.id)
            .ok_or_else(|| missing("invoices", invoice.id))?;
        *row = invoice.clone();
        Ok(())
    }

    async fn delete_invoice(&mut self, id: InvoiceId) -> Result<(), StoreError> {
        self.trip(FailPoint::DeleteInvoice)?;
        self.working
            .invoices
            .remove(&id)
            .ok_or_else(|| missing("invoices", id))?;
        self.working.invoice_items.retain(|item| item.invoice_id != id);
        Ok(())
    }

    async fn insert_invoice_items(&mut self, items: &[InvoiceItem]) -> Result<(), StoreError> {
        self.trip(FailPoint::InsertInvoiceItems)?;
        if let Some(item) = items
            .iter()
            .find(|item| !self.working.invoices.contains_key(&item.invoice_id))
        {
            return Err(missing("invoices", item.invoice_id));
        }
        self.working.invoice_items.extend_from_slice(items);
        Ok(())
    }

    async fn set_bookings_invoiced(
        &mut self,
        ids: &[BookingId],
        invoiced: bool,
    ) -> Result<(), StoreError> {
        self.trip(FailPoint::SetBookingsInvoiced)?;
        for id in ids {
            let booking = self
                .working
                .bookings
                .get_mut(id)
                .ok_or_else(|| missing("bookings", id))?;
            booking.is_invoiced = invoiced;
        }
        Ok(())
    }

    async fn set_payments_invoice(
        &mut self,
        ids: &[PaymentId],
        invoice_id: Option<InvoiceId>,
    ) -> Result<(), StoreError> {
        self.trip(FailPoint::SetPaymentsInvoice)?;
        for id in ids {
            let payment = self
                .working
                .payments
                .get_mut(id)
                .ok_or_else(|| missing("payments", id))?;
            payment.invoice_id = invoice_id;
        }
        Ok(())
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        self.trip(FailPoint::Commit)?;
        let Self { mut guard, working } = self;
        guard.tables = working;
        debug!("Memory store transaction committed");
        Ok(())
    }
}
