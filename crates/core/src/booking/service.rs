//! Booking lifecycle service.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use staydesk_shared::Actor;
use staydesk_shared::types::{BookingId, PageRequest, PageResponse, PropertyId};

use super::error::BookingError;
use super::types::{
    Booking, BookingFilter, BookingOptions, BookingStatus, CreateBookingInput, UpdateBookingInput,
};
use super::validation;
use crate::access::{AccessEvaluator, Operation, ResourceChain, ResourceKind, TenantScope};
use crate::audit::{AuditAction, AuditEvent, AuditSink, ResourceType};
use crate::finance::FinancialCalculator;
use crate::store::{BookingQuery, PaymentQuery, Store, StoreTx};
use crate::tenancy::Property;

/// Creates, reads, updates and removes bookings.
///
/// Every call re-derives authorization from the booking's property.
pub struct BookingService<S: Store> {
    store: Arc<S>,
    access: Arc<AccessEvaluator>,
    audit: Arc<dyn AuditSink>,
    options: BookingOptions,
}

impl<S: Store> BookingService<S> {
    /// Create a new booking service.
    #[must_use]
    pub fn new(store: Arc<S>, access: Arc<AccessEvaluator>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store,
            access,
            audit,
            options: BookingOptions::default(),
        }
    }

    /// Replace the service options.
    #[must_use]
    pub fn with_options(mut self, options: BookingOptions) -> Self {
        self.options = options;
        self
    }

    /// Create a booking.
    ///
    /// The property and room type are looked up in the actor's tenant and
    /// must agree with each other before access to the property is checked.
    ///
    /// # Arguments
    /// * `actor` - The user creating the booking
    /// * `input` - Stay, guest and amount details
    ///
    /// # Returns
    /// * `Ok(Booking)` with nights and financial figures derived
    ///
    /// # Errors
    ///
    /// - `PropertyNotFound` / `RoomTypeNotFound` if absent in the tenant
    /// - `RoomTypeMismatch` if the room type belongs to another property
    /// - `Access` if the actor may not book on the property
    /// - validation errors for dates, guests and amounts, including
    ///   `CommissionExceedsTotal`
    /// - `AmountOverflow` if a derived figure leaves the decimal range
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateBookingInput,
    ) -> Result<Booking, BookingError> {
        let scope = self.access.lookup_scope(actor)?;
        let mut tx = self.store.begin().await?;

        let property = tx
            .find_property(scope, input.property_id)
            .await?
            .ok_or(BookingError::PropertyNotFound(input.property_id))?;
        let room_type = tx
            .find_room_type(scope, input.room_type_id)
            .await?
            .ok_or(BookingError::RoomTypeNotFound(input.room_type_id))?;
        validation::validate_placement(&room_type, &property)?;

        let tenant_id =
            self.access
                .authorize(actor, &ResourceChain::property(&property), Operation::Create)?;

        let now = Utc::now();
        let mut booking = Booking {
            id: BookingId::new(),
            tenant_id,
            property_id: property.id,
            room_type_id: room_type.id,
            created_by: actor.id,
            guest_name: input.guest_name.trim().to_string(),
            guest_email: input.guest_email,
            guest_phone: input.guest_phone,
            channel: input.channel,
            check_in: input.check_in,
            check_out: input.check_out,
            nights: 0,
            adults: input.adults,
            children: input.children,
            total_amount: input.total_amount,
            commission: input.commission,
            net_revenue: Decimal::ZERO,
            amount_paid: input.amount_paid.unwrap_or(Decimal::ZERO),
            outstanding_balance: Decimal::ZERO,
            payment_method: input.payment_method,
            payment_type: input.payment_type,
            status: input.status.unwrap_or(BookingStatus::Pending),
            is_invoiced: false,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        validation::validate_booking(&booking)?;
        booking.apply_figures(FinancialCalculator::derive(&booking.financial_inputs())?);

        tx.insert_booking(&booking).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            tenant_id = %booking.tenant_id,
            property_id = %booking.property_id,
            nights = booking.nights,
            "Booking created"
        );
        self.audit.record(
            AuditEvent::new(
                AuditAction::Create,
                ResourceType::Booking,
                booking.id,
                actor,
                tenant_id,
            )
            .with_after(&booking),
        );
        Ok(booking)
    }

    /// Get a booking.
    ///
    /// # Arguments
    /// * `actor` - The user reading the booking
    /// * `id` - The booking to load
    ///
    /// # Returns
    /// * `Ok(Booking)` if the actor may read it
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking is absent in the actor's tenant and
    /// `Access` if the actor may not read it.
    pub async fn find_one(&self, actor: &Actor, id: BookingId) -> Result<Booking, BookingError> {
        let scope = self.access.lookup_scope(actor)?;
        let tx = self.store.begin().await?;
        let (booking, _) = self
            .load_authorized(&tx, actor, scope, id, Operation::Read)
            .await?;
        Ok(booking)
    }

    /// List bookings visible to the actor.
    ///
    /// Managers and partners only see bookings on properties they own.
    ///
    /// # Arguments
    /// * `actor` - The user listing bookings
    /// * `filter` - Property, status, direction and check-in narrowing
    /// * `page` - Page number and size
    ///
    /// # Returns
    /// * `Ok(PageResponse)` ordered by check-in date
    ///
    /// # Errors
    ///
    /// Returns `Access` for a tenant-less actor that is not a super admin.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Booking>, BookingError> {
        let mut scope = self.access.list_scope(actor)?;
        if let (TenantScope::All, Some(tenant_id)) = (scope.tenant, filter.tenant_id) {
            scope.tenant = TenantScope::Tenant(tenant_id);
        }

        let tx = self.store.begin().await?;
        let (bookings, total) = tx
            .list_bookings(&BookingQuery {
                scope,
                filter,
                page,
            })
            .await?;
        Ok(PageResponse::new(bookings, page, total))
    }

    /// Patch a booking.
    ///
    /// Absent fields keep their stored value. Financial fields are re-derived
    /// when the patch touches any of their inputs.
    ///
    /// # Arguments
    /// * `actor` - The user editing the booking
    /// * `id` - The booking to patch
    /// * `patch` - Fields to change; `None` keeps the stored value
    ///
    /// # Returns
    /// * `Ok(Booking)` as stored after the patch
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Access` as for [`Self::find_one`]
    /// - `CrossTenantReassignment` when moving to another tenant's property
    /// - `InvoicedFiguresFrozen` when an invoiced booking's total, commission
    ///   or payment type would change
    /// - `InvalidStatusTransition` when transitions are enforced
    /// - validation errors for the patched booking
    pub async fn update(
        &self,
        actor: &Actor,
        id: BookingId,
        patch: UpdateBookingInput,
    ) -> Result<Booking, BookingError> {
        let scope = self.access.lookup_scope(actor)?;
        let mut tx = self.store.begin().await?;
        let (before, property) = self
            .load_authorized(&tx, actor, scope, id, Operation::Update)
            .await?;

        if before.is_invoiced && patch.changes_invoiced_terms(&before) {
            return Err(BookingError::InvoicedFiguresFrozen(before.id));
        }

        let mut booking = before.clone();

        if patch.touches_placement() {
            let target = match patch.property_id {
                Some(property_id) if property_id != property.id => {
                    self.reassignment_target(&tx, actor, &before, property_id)
                        .await?
                }
                _ => property,
            };
            let room_type_id = patch.room_type_id.unwrap_or(before.room_type_id);
            let room_type = tx
                .find_room_type(scope, room_type_id)
                .await?
                .ok_or(BookingError::RoomTypeNotFound(room_type_id))?;
            validation::validate_placement(&room_type, &target)?;
            booking.property_id = target.id;
            booking.room_type_id = room_type.id;
        }

        if let Some(status) = patch.status {
            if self.options.enforce_status_transitions && !before.status.can_transition_to(status)
            {
                return Err(BookingError::InvalidStatusTransition {
                    from: before.status,
                    to: status,
                });
            }
            booking.status = status;
        }

        let touches_figures = patch.touches_figures();
        apply_patch(&mut booking, patch);
        validation::validate_booking(&booking)?;
        if touches_figures {
            booking.apply_figures(FinancialCalculator::derive(&booking.financial_inputs())?);
        }
        booking.updated_at = Utc::now();

        tx.update_booking(&booking).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            tenant_id = %booking.tenant_id,
            status = %booking.status,
            rederived = touches_figures,
            "Booking updated"
        );
        self.audit.record(
            AuditEvent::new(
                AuditAction::Update,
                ResourceType::Booking,
                booking.id,
                actor,
                booking.tenant_id,
            )
            .with_before(&before)
            .with_after(&booking),
        );
        Ok(booking)
    }

    /// Remove a booking.
    ///
    /// # Arguments
    /// * `actor` - The user removing the booking
    /// * `id` - The booking to remove
    ///
    /// # Returns
    /// * `Ok(())` once the booking is deleted
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Access` as for [`Self::find_one`]
    /// - `BookingInvoiced` while an invoice covers the booking
    /// - `HasPayments` while payments are recorded against it
    pub async fn remove(&self, actor: &Actor, id: BookingId) -> Result<(), BookingError> {
        let scope = self.access.lookup_scope(actor)?;
        let mut tx = self.store.begin().await?;
        let (booking, _) = self
            .load_authorized(&tx, actor, scope, id, Operation::Delete)
            .await?;

        if booking.is_invoiced {
            return Err(BookingError::BookingInvoiced(booking.id));
        }
        let payments = tx
            .list_payments(&PaymentQuery::new(scope).for_booking(booking.id))
            .await?;
        if !payments.is_empty() {
            return Err(BookingError::HasPayments(booking.id));
        }

        tx.delete_booking(booking.id).await?;
        tx.commit().await?;

        info!(booking_id = %booking.id, tenant_id = %booking.tenant_id, "Booking removed");
        self.audit.record(
            AuditEvent::new(
                AuditAction::Delete,
                ResourceType::Booking,
                booking.id,
                actor,
                booking.tenant_id,
            )
            .with_before(&booking),
        );
        Ok(())
    }

    /// Loads a booking and its property, then authorizes `op` on the chain.
    async fn load_authorized(
        &self,
        tx: &S::Tx,
        actor: &Actor,
        scope: TenantScope,
        id: BookingId,
        op: Operation,
    ) -> Result<(Booking, Property), BookingError> {
        let booking = tx
            .find_booking(scope, id)
            .await?
            .ok_or(BookingError::NotFound(id))?;
        let property = tx
            .find_property(scope, booking.property_id)
            .await?
            .ok_or(BookingError::NotFound(id))?;

        let chain = ResourceChain::through_property(
            ResourceKind::Booking,
            booking.id,
            booking.tenant_id,
            &property,
        );
        self.access.authorize(actor, &chain, op)?;
        Ok((booking, property))
    }

    /// Resolves the property a booking is being moved to.
    ///
    /// The lookup is unscoped so a move into another tenant is reported as
    /// such rather than as a missing property.
    async fn reassignment_target(
        &self,
        tx: &S::Tx,
        actor: &Actor,
        booking: &Booking,
        property_id: PropertyId,
    ) -> Result<Property, BookingError> {
        let target = tx
            .find_property(TenantScope::All, property_id)
            .await?
            .ok_or(BookingError::PropertyNotFound(property_id))?;
        if target.tenant_id != booking.tenant_id {
            return Err(BookingError::CrossTenantReassignment(property_id));
        }

        let chain = ResourceChain::through_property(
            ResourceKind::Booking,
            booking.id,
            booking.tenant_id,
            &target,
        );
        self.access.authorize(actor, &chain, Operation::Update)?;
        Ok(target)
    }
}

/// Copies the non-placement, non-status fields of a patch onto a booking.
fn apply_patch(booking: &mut Booking, patch: UpdateBookingInput) {
    if let Some(name) = patch.guest_name {
        booking.guest_name = name.trim().to_string();
    }
    if let Some(email) = patch.guest_email {
        booking.guest_email = Some(email);
    }
    if let Some(phone) = patch.guest_phone {
        booking.guest_phone = Some(phone);
    }
    if let Some(channel) = patch.channel {
        booking.channel = Some(channel);
    }
    if let Some(check_in) = patch.check_in {
        booking.check_in = check_in;
    }
    if let Some(check_out) = patch.check_out {
        booking.check_out = check_out;
    }
    if let Some(adults) = patch.adults {
        booking.adults = adults;
    }
    if let Some(children) = patch.children {
        booking.children = children;
    }
    if let Some(total) = patch.total_amount {
        booking.total_amount = total;
    }
    if let Some(commission) = patch.commission {
        booking.commission = Some(commission);
    }
    if let Some(paid) = patch.amount_paid {
        booking.amount_paid = paid;
    }
    if let Some(method) = patch.payment_method {
        booking.payment_method = Some(method);
    }
    if let Some(payment_type) = patch.payment_type {
        booking.payment_type = payment_type;
    }
    if let Some(notes) = patch.notes {
        booking.notes = Some(notes);
    }
}
