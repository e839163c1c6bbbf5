//! Aggregation strategies.
//!
//! A strategy decides which loaded members are eligible and what each one
//! contributes to the invoice total. Selection is all-or-nothing: if any
//! requested id is missing or ineligible the whole request fails, naming
//! every failing id.

use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;
use uuid::Uuid;

use staydesk_shared::types::{BookingId, PaymentId, TenantId};

use super::error::InvoiceError;
use super::types::AggregationStrategy;
use crate::booking::Booking;
use crate::finance::{FinancialCalculator, PaymentType};
use crate::payment::Payment;

/// Groups members of one kind into an invoice.
pub trait InvoiceAggregator {
    /// Member record.
    type Member;
    /// Member id.
    type Id: Copy + Eq + std::hash::Hash + Into<Uuid>;

    /// The strategy this aggregator implements.
    fn strategy(&self) -> AggregationStrategy;

    /// Id of a member.
    fn member_id(&self, member: &Self::Member) -> Self::Id;

    /// Tenant of a member.
    fn member_tenant(&self, member: &Self::Member) -> TenantId;

    /// Returns true if the member may join a new invoice.
    fn is_eligible(&self, member: &Self::Member) -> bool;

    /// What the member contributes to the invoice total.
    fn amount(&self, member: &Self::Member) -> Decimal;

    /// Rejects empty requests and repeated ids.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInvoice` or `DuplicateMembers` naming every repeated id.
    fn check_request(&self, requested: &[Self::Id]) -> Result<(), InvoiceError> {
        if requested.is_empty() {
            return Err(InvoiceError::EmptyInvoice);
        }
        let mut seen = HashSet::with_capacity(requested.len());
        let duplicates: BTreeSet<Uuid> = requested
            .iter()
            .filter(|id| !seen.insert(**id))
            .map(|id| (*id).into())
            .collect();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(InvoiceError::DuplicateMembers {
                ids: duplicates.into_iter().collect(),
            })
        }
    }

    /// Keeps the eligible members, failing unless every requested id is
    /// among them.
    ///
    /// # Errors
    ///
    /// Returns `MembersNotFound` with every missing or ineligible id, sorted.
    fn select(
        &self,
        requested: &[Self::Id],
        loaded: Vec<Self::Member>,
    ) -> Result<Vec<Self::Member>, InvoiceError> {
        let eligible: Vec<Self::Member> = loaded
            .into_iter()
            .filter(|m| self.is_eligible(m))
            .collect();
        let found: HashSet<Self::Id> = eligible.iter().map(|m| self.member_id(m)).collect();
        let failing: BTreeSet<Uuid> = requested
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| (*id).into())
            .collect();
        if failing.is_empty() {
            Ok(eligible)
        } else {
            Err(InvoiceError::MembersNotFound {
                ids: failing.into_iter().collect(),
            })
        }
    }

    /// The single tenant shared by every member.
    ///
    /// # Errors
    ///
    /// Returns `MixedTenants` if members span tenants and `EmptyInvoice` if
    /// there are none.
    fn common_tenant(&self, members: &[Self::Member]) -> Result<TenantId, InvoiceError> {
        let mut tenants = members.iter().map(|m| self.member_tenant(m));
        let first = tenants.next().ok_or(InvoiceError::EmptyInvoice)?;
        if tenants.all(|t| t == first) {
            Ok(first)
        } else {
            Err(InvoiceError::MixedTenants)
        }
    }

    /// Sum of member amounts.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceError::AmountOverflow`] if the sum leaves the decimal range.
    fn total(&self, members: &[Self::Member]) -> Result<Decimal, InvoiceError> {
        Ok(FinancialCalculator::total(
            members.iter().map(|m| self.amount(m)),
        )?)
    }
}

/// Groups bookings of one collection direction.
///
/// Eligible bookings are not yet invoiced and match the requested direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateByBookings {
    /// Direction every booking must have.
    pub payment_type: PaymentType,
}

impl AggregateByBookings {
    /// Creates the strategy for a collection direction.
    #[must_use]
    pub const fn new(payment_type: PaymentType) -> Self {
        Self { payment_type }
    }
}

impl InvoiceAggregator for AggregateByBookings {
    type Member = Booking;
    type Id = BookingId;

    fn strategy(&self) -> AggregationStrategy {
        AggregationStrategy::Bookings
    }

    fn member_id(&self, member: &Booking) -> BookingId {
        member.id
    }

    fn member_tenant(&self, member: &Booking) -> TenantId {
        member.tenant_id
    }

    fn is_eligible(&self, member: &Booking) -> bool {
        !member.is_invoiced && member.payment_type == self.payment_type
    }

    fn amount(&self, member: &Booking) -> Decimal {
        member.total_amount
    }
}

/// Groups settled payments not yet on an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateByPayments;

impl InvoiceAggregator for AggregateByPayments {
    type Member = Payment;
    type Id = PaymentId;

    fn strategy(&self) -> AggregationStrategy {
        AggregationStrategy::Payments
    }

    fn member_id(&self, member: &Payment) -> PaymentId {
        member.id
    }

    fn member_tenant(&self, member: &Payment) -> TenantId {
        member.tenant_id
    }

    fn is_eligible(&self, member: &Payment) -> bool {
        member.status.is_settled() && member.invoice_id.is_none()
    }

    fn amount(&self, member: &Payment) -> Decimal {
        member.amount
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use staydesk_shared::types::{
        BookingId, PaymentId, PropertyId, RoomTypeId, TenantId, UserId,
    };

    use crate::booking::{Booking, BookingStatus};
    use crate::finance::{PaymentMethod, PaymentType};
    use crate::payment::{Payment, PaymentStatus};

    pub fn booking(tenant_id: TenantId, total: Decimal, payment_type: PaymentType) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            tenant_id,
            property_id: PropertyId::new(),
            room_type_id: RoomTypeId::new(),
            created_by: UserId::new(),
            guest_name: "Guest".to_string(),
            guest_email: None,
            guest_phone: None,
            channel: None,
            check_in: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            nights: 1,
            adults: 1,
            children: 0,
            total_amount: total,
            commission: None,
            net_revenue: total,
            amount_paid: Decimal::ZERO,
            outstanding_balance: total,
            payment_method: None,
            payment_type,
            status: BookingStatus::Confirmed,
            is_invoiced: false,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn payment(tenant_id: TenantId, amount: Decimal, status: PaymentStatus) -> Payment {
        let now = Utc::now();
        Payment {
            id: PaymentId::new(),
            tenant_id,
            booking_id: BookingId::new(),
            payment_type: PaymentType::HotelCollect,
            method: PaymentMethod::Cash,
            amount,
            payment_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            status,
            collected_by_id: Some(UserId::new()),
            received_from: None,
            invoice_id: None,
            reference: None,
            notes: None,
            created_by: UserId::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
