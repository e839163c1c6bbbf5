//! Invoice aggregation service.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use staydesk_shared::Actor;
use staydesk_shared::types::{
    BookingId, InvoiceId, InvoiceItemId, PageRequest, PageResponse, PropertyId, TenantId,
};

use super::aggregation::{AggregateByBookings, AggregateByPayments, InvoiceAggregator};
use super::error::InvoiceError;
use super::number::{InvoiceNumberGenerator, RandomNumberGenerator};
use super::status::{self, StatusChange};
use super::types::{
    AggregationStrategy, CancelOutcome, CreateFromBookingsInput, CreateFromPaymentsInput,
    Invoice, InvoiceDetails, InvoiceFilter, InvoiceItem, InvoiceOptions, InvoiceStatus,
};
use crate::access::{AccessEvaluator, Operation, ResourceChain, ResourceKind, TenantScope};
use crate::audit::{AuditAction, AuditEvent, AuditSink, ResourceType};
use crate::finance::PaymentType;
use crate::store::error::INVOICE_NUMBER_CONSTRAINT;
use crate::store::{InvoiceQuery, PaymentQuery, Store, StoreTx};

/// Groups bookings or payments into invoices and manages their status.
///
/// Aggregation, status changes that release members, and cancellation each
/// run inside a single store transaction.
pub struct InvoiceService<S: Store> {
    store: Arc<S>,
    access: Arc<AccessEvaluator>,
    audit: Arc<dyn AuditSink>,
    numbers: Arc<dyn InvoiceNumberGenerator>,
    options: InvoiceOptions,
}

impl<S: Store> InvoiceService<S> {
    /// Create a new invoice service with random invoice numbers.
    #[must_use]
    pub fn new(store: Arc<S>, access: Arc<AccessEvaluator>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store,
            access,
            audit,
            numbers: Arc::new(RandomNumberGenerator),
            options: InvoiceOptions::default(),
        }
    }

    /// Replace the service options.
    #[must_use]
    pub fn with_options(mut self, options: InvoiceOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the invoice number source.
    #[must_use]
    pub fn with_number_generator(mut self, numbers: Arc<dyn InvoiceNumberGenerator>) -> Self {
        self.numbers = numbers;
        self
    }

    /// Invoice a set of bookings of one collection direction.
    ///
    /// On success every booking is flagged invoiced in the same transaction
    /// that creates the invoice and its items.
    ///
    /// # Arguments
    /// * `actor` - The user issuing the invoice
    /// * `input` - Booking ids and the collection direction they must share
    ///
    /// # Returns
    /// * `Ok(InvoiceDetails)` with one item per booking
    ///
    /// # Errors
    ///
    /// - `Access` for read-only roles, and for managers or partners not owning
    ///   every booked property
    /// - `EmptyInvoice` / `DuplicateMembers` for malformed requests
    /// - `MembersNotFound` naming every missing, foreign, invoiced or
    ///   wrong-direction booking
    /// - `AmountOverflow` if the total leaves the decimal range
    /// - `NumberCollision` when no unique number could be allocated
    pub async fn create_from_bookings(
        &self,
        actor: &Actor,
        input: CreateFromBookingsInput,
    ) -> Result<InvoiceDetails, InvoiceError> {
        self.access.require_writer(actor)?;
        let scope = self.access.lookup_scope(actor)?;
        let aggregator = AggregateByBookings::new(input.payment_type);
        aggregator.check_request(&input.booking_ids)?;

        let mut tx = self.store.begin().await?;
        let loaded = tx.find_bookings(scope, &input.booking_ids).await?;
        debug!(
            requested = input.booking_ids.len(),
            loaded = loaded.len(),
            payment_type = %input.payment_type,
            "Checking booking eligibility"
        );
        let bookings = aggregator.select(&input.booking_ids, loaded)?;
        let tenant_id = aggregator.common_tenant(&bookings)?;

        let invoice_id = InvoiceId::new();
        let property_ids: Vec<PropertyId> = bookings.iter().map(|b| b.property_id).collect();
        self.authorize_properties(&tx, actor, tenant_id, invoice_id, &property_ids, Operation::Create)
            .await?;

        let mut invoice = self.draft(
            invoice_id,
            tenant_id,
            actor,
            aggregator.strategy(),
            Some(input.payment_type),
            aggregator.total(&bookings)?,
            input.notes,
        );
        self.insert_numbered(&mut tx, &mut invoice).await?;

        let items: Vec<InvoiceItem> = bookings
            .iter()
            .map(|b| InvoiceItem {
                id: InvoiceItemId::new(),
                invoice_id,
                booking_id: b.id,
                amount: b.total_amount,
                commission: b.commission.unwrap_or(Decimal::ZERO),
                net_revenue: b.net_revenue,
            })
            .collect();
        tx.insert_invoice_items(&items).await?;
        tx.set_bookings_invoiced(&input.booking_ids, true).await?;
        tx.commit().await?;

        let details = InvoiceDetails {
            invoice,
            items,
            payment_ids: Vec::new(),
        };
        self.record_created(actor, &details);
        Ok(details)
    }

    /// Invoice a set of settled payments.
    ///
    /// On success every payment points at the invoice, written in the same
    /// transaction that creates it.
    ///
    /// # Arguments
    /// * `actor` - The user issuing the invoice
    /// * `input` - Ids of settled payments
    ///
    /// # Returns
    /// * `Ok(InvoiceDetails)` listing the grouped payment ids
    ///
    /// # Errors
    ///
    /// As for [`Self::create_from_bookings`]; eligible payments are settled
    /// and not yet on an invoice.
    pub async fn create_from_payments(
        &self,
        actor: &Actor,
        input: CreateFromPaymentsInput,
    ) -> Result<InvoiceDetails, InvoiceError> {
        self.access.require_writer(actor)?;
        let scope = self.access.lookup_scope(actor)?;
        let aggregator = AggregateByPayments;
        aggregator.check_request(&input.payment_ids)?;

        let mut tx = self.store.begin().await?;
        let loaded = tx.find_payments(scope, &input.payment_ids).await?;
        debug!(
            requested = input.payment_ids.len(),
            loaded = loaded.len(),
            "Checking payment eligibility"
        );
        let payments = aggregator.select(&input.payment_ids, loaded)?;
        let tenant_id = aggregator.common_tenant(&payments)?;

        let invoice_id = InvoiceId::new();
        let booking_ids: Vec<BookingId> = payments.iter().map(|p| p.booking_id).collect();
        let property_ids = self
            .booking_properties(&tx, tenant_id, &booking_ids)
            .await?;
        self.authorize_properties(&tx, actor, tenant_id, invoice_id, &property_ids, Operation::Create)
            .await?;

        let mut invoice = self.draft(
            invoice_id,
            tenant_id,
            actor,
            aggregator.strategy(),
            None,
            aggregator.total(&payments)?,
            input.notes,
        );
        self.insert_numbered(&mut tx, &mut invoice).await?;
        tx.set_payments_invoice(&input.payment_ids, Some(invoice_id))
            .await?;
        tx.commit().await?;

        let details = InvoiceDetails {
            invoice,
            items: Vec::new(),
            payment_ids: input.payment_ids,
        };
        self.record_created(actor, &details);
        Ok(details)
    }

    /// Get an invoice with its members.
    ///
    /// # Arguments
    /// * `actor` - The user reading the invoice
    /// * `id` - The invoice to load
    ///
    /// # Returns
    /// * `Ok(InvoiceDetails)` with items or payment ids by strategy
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent in the actor's tenant and `Access` unless
    /// the actor may read every property the invoice reaches.
    pub async fn find_one(
        &self,
        actor: &Actor,
        id: InvoiceId,
    ) -> Result<InvoiceDetails, InvoiceError> {
        let scope = self.access.lookup_scope(actor)?;
        let tx = self.store.begin().await?;
        self.load_authorized(&tx, actor, scope, id, Operation::Read)
            .await
    }

    /// List invoices visible to the actor.
    ///
    /// # Arguments
    /// * `actor` - The user listing invoices
    /// * `filter` - Status and strategy narrowing
    /// * `page` - Page number and size
    ///
    /// # Returns
    /// * `Ok(PageResponse)` newest first
    ///
    /// # Errors
    ///
    /// Returns `Access` for a tenant-less actor that is not a super admin.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: InvoiceFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Invoice>, InvoiceError> {
        let mut scope = self.access.list_scope(actor)?;
        if let (TenantScope::All, Some(tenant_id)) = (scope.tenant, filter.tenant_id) {
            scope.tenant = TenantScope::Tenant(tenant_id);
        }

        let tx = self.store.begin().await?;
        let (invoices, total) = tx
            .list_invoices(&InvoiceQuery {
                scope,
                filter,
                page,
            })
            .await?;
        Ok(PageResponse::new(invoices, page, total))
    }

    /// Change an invoice's status.
    ///
    /// `CANCELLED` goes through the cancellation path. `VOID` releases every
    /// member but keeps the invoice. Writing the current status is a no-op.
    ///
    /// # Arguments
    /// * `actor` - The user changing the status
    /// * `id` - The invoice to change
    /// * `next` - The requested status
    ///
    /// # Returns
    /// * `Ok(Invoice)` in its new status
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Access` as for [`Self::find_one`]
    /// - `TerminalStatus` for void or cancelled invoices
    /// - `PaidInvoiceImmutable` when moving a paid invoice
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: InvoiceId,
        next: InvoiceStatus,
    ) -> Result<Invoice, InvoiceError> {
        let scope = self.access.lookup_scope(actor)?;
        let mut tx = self.store.begin().await?;
        let details = self
            .load_authorized(&tx, actor, scope, id, Operation::Update)
            .await?;

        match status::plan_status_change(details.invoice.status, next)? {
            StatusChange::Unchanged => Ok(details.invoice),
            StatusChange::Release(InvoiceStatus::Cancelled) => {
                let mut snapshot = details.invoice.clone();
                match self.finish_cancel(tx, actor, details).await? {
                    CancelOutcome::Cancelled(invoice) => Ok(invoice),
                    CancelOutcome::Deleted(_) => {
                        snapshot.status = InvoiceStatus::Cancelled;
                        Ok(snapshot)
                    }
                }
            }
            StatusChange::Release(to) | StatusChange::Advance(to) => {
                let releases = to.releases_members();
                if releases {
                    self.release_members(&mut tx, &details).await?;
                }
                let before = details.invoice;
                let mut invoice = before.clone();
                invoice.status = to;
                invoice.updated_at = Utc::now();
                tx.update_invoice(&invoice).await?;
                tx.commit().await?;

                info!(
                    invoice_id = %invoice.id,
                    tenant_id = %invoice.tenant_id,
                    from = %before.status,
                    to = %invoice.status,
                    released = releases,
                    "Invoice status changed"
                );
                self.audit.record(
                    AuditEvent::new(
                        AuditAction::StatusChange,
                        ResourceType::Invoice,
                        invoice.id,
                        actor,
                        invoice.tenant_id,
                    )
                    .with_before(&before)
                    .with_after(&invoice),
                );
                Ok(invoice)
            }
        }
    }

    /// Cancel an invoice, releasing every member.
    ///
    /// Booking-grouped invoices are kept with status `CANCELLED`;
    /// payment-grouped invoices are deleted.
    ///
    /// # Arguments
    /// * `actor` - The user cancelling the invoice
    /// * `id` - The invoice to cancel
    ///
    /// # Returns
    /// * `Ok(CancelOutcome)` saying whether the invoice was kept or deleted
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Access` as for [`Self::find_one`]
    /// - `CannotCancel` for paid, void and cancelled invoices
    pub async fn cancel(&self, actor: &Actor, id: InvoiceId) -> Result<CancelOutcome, InvoiceError> {
        let scope = self.access.lookup_scope(actor)?;
        let tx = self.store.begin().await?;
        let details = self
            .load_authorized(&tx, actor, scope, id, Operation::Delete)
            .await?;
        status::validate_cancel(details.invoice.status)?;
        self.finish_cancel(tx, actor, details).await
    }

    /// Releases members, then cancels or deletes the invoice, and commits.
    async fn finish_cancel(
        &self,
        mut tx: S::Tx,
        actor: &Actor,
        details: InvoiceDetails,
    ) -> Result<CancelOutcome, InvoiceError> {
        self.release_members(&mut tx, &details).await?;

        let before = details.invoice;
        let outcome = match before.strategy {
            AggregationStrategy::Bookings => {
                let mut invoice = before.clone();
                invoice.status = InvoiceStatus::Cancelled;
                invoice.updated_at = Utc::now();
                tx.update_invoice(&invoice).await?;
                CancelOutcome::Cancelled(invoice)
            }
            AggregationStrategy::Payments => {
                tx.delete_invoice(before.id).await?;
                CancelOutcome::Deleted(before.id)
            }
        };
        tx.commit().await?;

        info!(
            invoice_id = %before.id,
            tenant_id = %before.tenant_id,
            strategy = %before.strategy,
            deleted = matches!(outcome, CancelOutcome::Deleted(_)),
            "Invoice cancelled"
        );
        let event = AuditEvent::new(
            AuditAction::Cancel,
            ResourceType::Invoice,
            before.id,
            actor,
            before.tenant_id,
        )
        .with_before(&before);
        let event = match &outcome {
            CancelOutcome::Cancelled(invoice) => event.with_after(invoice),
            CancelOutcome::Deleted(_) => event,
        };
        self.audit.record(event);
        Ok(outcome)
    }

    /// Makes every member of the invoice eligible again.
    async fn release_members(
        &self,
        tx: &mut S::Tx,
        details: &InvoiceDetails,
    ) -> Result<(), InvoiceError> {
        match details.invoice.strategy {
            AggregationStrategy::Bookings => {
                let booking_ids: Vec<BookingId> =
                    details.items.iter().map(|item| item.booking_id).collect();
                tx.set_bookings_invoiced(&booking_ids, false).await?;
            }
            AggregationStrategy::Payments => {
                tx.set_payments_invoice(&details.payment_ids, None).await?;
            }
        }
        debug!(
            invoice_id = %details.invoice.id,
            items = details.items.len(),
            payments = details.payment_ids.len(),
            "Invoice members released"
        );
        Ok(())
    }

    /// Loads an invoice with its members and authorizes `op` over every
    /// property the members reach.
    async fn load_authorized(
        &self,
        tx: &S::Tx,
        actor: &Actor,
        scope: TenantScope,
        id: InvoiceId,
        op: Operation,
    ) -> Result<InvoiceDetails, InvoiceError> {
        let invoice = tx
            .find_invoice(scope, id)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;
        let tenant_scope = TenantScope::Tenant(invoice.tenant_id);

        let (items, payment_ids, booking_ids) = match invoice.strategy {
            AggregationStrategy::Bookings => {
                let items = tx.list_invoice_items(invoice.id).await?;
                let booking_ids: Vec<BookingId> = items.iter().map(|i| i.booking_id).collect();
                (items, Vec::new(), booking_ids)
            }
            AggregationStrategy::Payments => {
                let payments = tx
                    .list_payments(&PaymentQuery::new(tenant_scope).for_invoice(invoice.id))
                    .await?;
                let booking_ids: Vec<BookingId> = payments.iter().map(|p| p.booking_id).collect();
                let payment_ids = payments.into_iter().map(|p| p.id).collect();
                (Vec::new(), payment_ids, booking_ids)
            }
        };

        let property_ids = self
            .booking_properties(tx, invoice.tenant_id, &booking_ids)
            .await?;
        self.authorize_properties(tx, actor, invoice.tenant_id, invoice.id, &property_ids, op)
            .await?;

        Ok(InvoiceDetails {
            invoice,
            items,
            payment_ids,
        })
    }

    /// Properties of a set of bookings, deduplicated.
    async fn booking_properties(
        &self,
        tx: &S::Tx,
        tenant_id: TenantId,
        booking_ids: &[BookingId],
    ) -> Result<Vec<PropertyId>, InvoiceError> {
        let mut unique = booking_ids.to_vec();
        unique.sort();
        unique.dedup();
        let bookings = tx
            .find_bookings(TenantScope::Tenant(tenant_id), &unique)
            .await?;
        Ok(bookings.iter().map(|b| b.property_id).collect())
    }

    /// Authorizes `op` over every listed property, all-or-nothing.
    async fn authorize_properties(
        &self,
        tx: &S::Tx,
        actor: &Actor,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
        property_ids: &[PropertyId],
        op: Operation,
    ) -> Result<(), InvoiceError> {
        let mut unique = property_ids.to_vec();
        unique.sort();
        unique.dedup();
        let properties = tx
            .find_properties(TenantScope::Tenant(tenant_id), &unique)
            .await?;

        let chain = ResourceChain::through_properties(
            ResourceKind::Invoice,
            invoice_id,
            tenant_id,
            &properties,
        );
        self.access.authorize(actor, &chain, op)?;
        Ok(())
    }

    /// Inserts the invoice, drawing a fresh number on every unique-index
    /// collision up to the configured number of attempts.
    async fn insert_numbered(
        &self,
        tx: &mut S::Tx,
        invoice: &mut Invoice,
    ) -> Result<(), InvoiceError> {
        let issued_on = invoice.created_at.date_naive();
        let attempts = self.options.number_attempts.max(1);
        for attempt in 1..=attempts {
            invoice.invoice_number = self.numbers.generate(
                &self.options.number_prefix,
                issued_on,
                self.options.suffix_length,
            );
            match tx.insert_invoice(invoice).await {
                Ok(()) => return Ok(()),
                Err(err) if err.violates(INVOICE_NUMBER_CONSTRAINT) => {
                    warn!(
                        attempt,
                        attempts,
                        invoice_number = %invoice.invoice_number,
                        "Invoice number collision"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(InvoiceError::NumberCollision { attempts })
    }

    #[allow(clippy::too_many_arguments)]
    fn draft(
        &self,
        id: InvoiceId,
        tenant_id: TenantId,
        actor: &Actor,
        strategy: AggregationStrategy,
        payment_type: Option<PaymentType>,
        total_amount: Decimal,
        notes: Option<String>,
    ) -> Invoice {
        let now = Utc::now();
        Invoice {
            id,
            tenant_id,
            invoice_number: String::new(),
            strategy,
            payment_type,
            total_amount,
            status: InvoiceStatus::Draft,
            notes,
            created_by: actor.id,
            created_at: now,
            updated_at: now,
        }
    }

    fn record_created(&self, actor: &Actor, details: &InvoiceDetails) {
        let invoice = &details.invoice;
        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            tenant_id = %invoice.tenant_id,
            strategy = %invoice.strategy,
            members = details.items.len() + details.payment_ids.len(),
            total_amount = %invoice.total_amount,
            "Invoice created"
        );
        self.audit.record(
            AuditEvent::new(
                AuditAction::Create,
                ResourceType::Invoice,
                invoice.id,
                actor,
                invoice.tenant_id,
            )
            .with_after(details),
        );
    }
}
