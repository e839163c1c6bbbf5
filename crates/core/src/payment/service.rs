//! Payment recorder service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use staydesk_shared::types::{BookingId, PaymentId};
use staydesk_shared::{Actor, Role};

use super::error::PaymentError;
use super::types::{CreatePaymentInput, Payment, UpdatePaymentInput};
use super::validation;
use crate::access::{AccessEvaluator, Operation, ResourceChain, ResourceKind, TenantScope};
use crate::audit::{AuditAction, AuditEvent, AuditSink, ResourceType};
use crate::booking::Booking;
use crate::store::{PaymentQuery, Store, StoreTx};

/// Records payments against bookings.
///
/// Authorization walks Payment → Booking → Property.
pub struct PaymentService<S: Store> {
    store: Arc<S>,
    access: Arc<AccessEvaluator>,
    audit: Arc<dyn AuditSink>,
}

impl<S: Store> PaymentService<S> {
    /// Create a new payment service.
    #[must_use]
    pub fn new(store: Arc<S>, access: Arc<AccessEvaluator>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store,
            access,
            audit,
        }
    }

    /// Record a payment.
    ///
    /// # Arguments
    /// * `actor` - The user recording the payment
    /// * `input` - Booking, direction, method, amount and date
    ///
    /// # Returns
    /// * `Ok(Payment)` as stored, status defaulting to completed
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the booking is absent in the actor's tenant
    /// - `Access` if the actor may not write to the booking
    /// - `MissingField` / `FieldNotAllowed` for direction-specific fields
    /// - `CollectorNotFound` if the collector is absent, inactive or foreign
    /// - `MethodNotAllowed`, `PaymentDateBeforeCheckout`, `NonPositiveAmount`
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreatePaymentInput,
    ) -> Result<Payment, PaymentError> {
        let scope = self.access.lookup_scope(actor)?;
        let mut tx = self.store.begin().await?;

        let booking = self
            .load_booking(&tx, actor, scope, input.booking_id, Operation::Create)
            .await?;

        let collector = validation::validate_direction_fields(
            input.payment_type,
            input.collected_by_id,
            input.received_from.as_deref(),
        )?;
        if let Some(collector_id) = collector {
            let active = tx
                .find_user(TenantScope::Tenant(booking.tenant_id), collector_id)
                .await?
                .is_some_and(|user| user.is_active_member_of(booking.tenant_id));
            if !active {
                return Err(PaymentError::CollectorNotFound(collector_id));
            }
        }
        validation::validate_method(input.method, input.payment_type)?;
        validation::validate_amount(input.amount)?;
        validation::validate_payment_date(
            input.payment_type,
            input.payment_date,
            booking.check_out,
        )?;

        let now = Utc::now();
        let payment = Payment {
            id: PaymentId::new(),
            tenant_id: booking.tenant_id,
            booking_id: booking.id,
            payment_type: input.payment_type,
            method: input.method,
            amount: input.amount,
            payment_date: input.payment_date,
            status: input.status.unwrap_or_default(),
            collected_by_id: collector,
            received_from: input
                .received_from
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            invoice_id: None,
            reference: input.reference,
            notes: input.notes,
            created_by: actor.id,
            created_at: now,
            updated_at: now,
        };

        tx.insert_payment(&payment).await?;
        tx.commit().await?;

        info!(
            payment_id = %payment.id,
            booking_id = %payment.booking_id,
            tenant_id = %payment.tenant_id,
            payment_type = %payment.payment_type,
            amount = %payment.amount,
            "Payment recorded"
        );
        self.audit.record(
            AuditEvent::new(
                AuditAction::Create,
                ResourceType::Payment,
                payment.id,
                actor,
                payment.tenant_id,
            )
            .with_after(&payment),
        );
        Ok(payment)
    }

    /// Get a payment.
    ///
    /// # Arguments
    /// * `actor` - The user reading the payment
    /// * `id` - The payment to load
    ///
    /// # Returns
    /// * `Ok(Payment)` if the actor may read its booking
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the payment is absent in the actor's tenant and
    /// `Access` if the actor may not read its booking.
    pub async fn find_one(&self, actor: &Actor, id: PaymentId) -> Result<Payment, PaymentError> {
        let scope = self.access.lookup_scope(actor)?;
        let tx = self.store.begin().await?;
        let (payment, _) = self
            .load_authorized(&tx, actor, scope, id, Operation::Read)
            .await?;
        Ok(payment)
    }

    /// List the payments of a booking, oldest first.
    ///
    /// # Arguments
    /// * `actor` - The user reading the booking
    /// * `booking_id` - The booking whose payments are listed
    ///
    /// # Returns
    /// * `Ok(Vec<Payment>)` ordered by payment date
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` or `Access` as for the booking itself.
    pub async fn list_for_booking(
        &self,
        actor: &Actor,
        booking_id: BookingId,
    ) -> Result<Vec<Payment>, PaymentError> {
        let scope = self.access.lookup_scope(actor)?;
        let tx = self.store.begin().await?;
        let booking = self
            .load_booking(&tx, actor, scope, booking_id, Operation::Read)
            .await?;
        let payments = tx
            .list_payments(&PaymentQuery::new(scope).for_booking(booking.id))
            .await?;
        Ok(payments)
    }

    /// Patch a payment.
    ///
    /// Booking, direction, collector and channel cannot change. The channel
    /// remittance date rule is re-checked whenever the date changes.
    ///
    /// # Arguments
    /// * `actor` - The user editing the payment
    /// * `id` - The payment to patch
    /// * `patch` - Fields to change; `None` keeps the stored value
    ///
    /// # Returns
    /// * `Ok(Payment)` as stored after the patch
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Access` as for [`Self::find_one`]
    /// - `PaymentInvoiced` when changing the amount or status of an invoiced payment
    /// - the field rules of [`Self::create`]
    pub async fn update(
        &self,
        actor: &Actor,
        id: PaymentId,
        patch: UpdatePaymentInput,
    ) -> Result<Payment, PaymentError> {
        let scope = self.access.lookup_scope(actor)?;
        let mut tx = self.store.begin().await?;
        let (before, booking) = self
            .load_authorized(&tx, actor, scope, id, Operation::Update)
            .await?;

        if before.is_invoiced() {
            let amount_changes = patch.amount.is_some_and(|a| a != before.amount);
            let status_changes = patch.status.is_some_and(|s| s != before.status);
            if amount_changes || status_changes {
                return Err(PaymentError::PaymentInvoiced(before.id));
            }
        }

        let mut payment = before.clone();
        if let Some(method) = patch.method {
            validation::validate_method(method, payment.payment_type)?;
            payment.method = method;
        }
        if let Some(amount) = patch.amount {
            validation::validate_amount(amount)?;
            payment.amount = amount;
        }
        if let Some(payment_date) = patch.payment_date {
            validation::validate_payment_date(
                payment.payment_type,
                payment_date,
                booking.check_out,
            )?;
            payment.payment_date = payment_date;
        }
        if let Some(status) = patch.status {
            payment.status = status;
        }
        if let Some(reference) = patch.reference {
            payment.reference = Some(reference);
        }
        if let Some(notes) = patch.notes {
            payment.notes = Some(notes);
        }
        payment.updated_at = Utc::now();

        tx.update_payment(&payment).await?;
        tx.commit().await?;

        info!(
            payment_id = %payment.id,
            tenant_id = %payment.tenant_id,
            status = %payment.status,
            "Payment updated"
        );
        self.audit.record(
            AuditEvent::new(
                AuditAction::Update,
                ResourceType::Payment,
                payment.id,
                actor,
                payment.tenant_id,
            )
            .with_before(&before)
            .with_after(&payment),
        );
        Ok(payment)
    }

    /// Remove a payment. Only a super admin may do this.
    ///
    /// # Arguments
    /// * `actor` - Must be a super admin
    /// * `id` - The payment to remove
    ///
    /// # Returns
    /// * `Ok(())` once the payment is deleted
    ///
    /// # Errors
    ///
    /// - `Access` for any other role
    /// - `NotFound` if the payment does not exist
    /// - `PaymentInvoiced` while an invoice groups the payment
    pub async fn remove(&self, actor: &Actor, id: PaymentId) -> Result<(), PaymentError> {
        self.access.require_role(actor, Role::SuperAdmin)?;

        let mut tx = self.store.begin().await?;
        let payment = tx
            .find_payment(TenantScope::All, id)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        if payment.is_invoiced() {
            return Err(PaymentError::PaymentInvoiced(payment.id));
        }

        tx.delete_payment(payment.id).await?;
        tx.commit().await?;

        info!(payment_id = %payment.id, tenant_id = %payment.tenant_id, "Payment removed");
        self.audit.record(
            AuditEvent::new(
                AuditAction::Delete,
                ResourceType::Payment,
                payment.id,
                actor,
                payment.tenant_id,
            )
            .with_before(&payment),
        );
        Ok(())
    }

    /// Loads a booking and authorizes `op` through its property.
    async fn load_booking(
        &self,
        tx: &S::Tx,
        actor: &Actor,
        scope: TenantScope,
        booking_id: BookingId,
        op: Operation,
    ) -> Result<Booking, PaymentError> {
        let booking = tx
            .find_booking(scope, booking_id)
            .await?
            .ok_or(PaymentError::BookingNotFound(booking_id))?;
        let property = tx
            .find_property(scope, booking.property_id)
            .await?
            .ok_or(PaymentError::BookingNotFound(booking_id))?;

        let chain = ResourceChain::through_property(
            ResourceKind::Booking,
            booking.id,
            booking.tenant_id,
            &property,
        );
        self.access.authorize(actor, &chain, op)?;
        Ok(booking)
    }

    /// Loads a payment with its booking and authorizes `op` on the chain.
    async fn load_authorized(
        &self,
        tx: &S::Tx,
        actor: &Actor,
        scope: TenantScope,
        id: PaymentId,
        op: Operation,
    ) -> Result<(Payment, Booking), PaymentError> {
        let payment = tx
            .find_payment(scope, id)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        let booking = tx
            .find_booking(scope, payment.booking_id)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        let property = tx
            .find_property(scope, booking.property_id)
            .await?
            .ok_or(PaymentError::NotFound(id))?;

        let chain = ResourceChain::through_property(
            ResourceKind::Payment,
            payment.id,
            payment.tenant_id,
            &property,
        );
        self.access.authorize(actor, &chain, op)?;
        Ok((payment, booking))
    }
}
