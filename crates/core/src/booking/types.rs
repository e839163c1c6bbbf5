//! Booking domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use staydesk_shared::types::{BookingId, PropertyId, RoomTypeId, TenantId, UserId};

use crate::finance::{BookingFigures, FinancialInputs, PaymentMethod, PaymentType};

/// Stay status of a booking.
///
/// The forward graph is:
/// - Pending → Confirmed → `CheckedIn` → `CheckedOut`
/// - Pending | Confirmed → Cancelled
/// - Pending | Confirmed → `NoShow`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Requested, not yet confirmed.
    Pending,
    /// Confirmed by the property.
    Confirmed,
    /// Guest has arrived.
    CheckedIn,
    /// Guest has left.
    CheckedOut,
    /// Cancelled before arrival.
    Cancelled,
    /// Guest never arrived.
    NoShow,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::CheckedOut => "CHECKED_OUT",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CHECKED_IN" => Some(Self::CheckedIn),
            "CHECKED_OUT" => Some(Self::CheckedOut),
            "CANCELLED" => Some(Self::Cancelled),
            "NO_SHOW" => Some(Self::NoShow),
            _ => None,
        }
    }

    /// Returns true if `next` is reachable from this status in one step.
    ///
    /// Writing the current status again is always legal.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled | Self::NoShow)
                | (Self::Confirmed, Self::CheckedIn | Self::Cancelled | Self::NoShow)
                | (Self::CheckedIn, Self::CheckedOut)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation of a room type at a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking id.
    pub id: BookingId,
    /// Owning tenant; always the property's tenant.
    pub tenant_id: TenantId,
    /// Property the booking is for.
    pub property_id: PropertyId,
    /// Room type booked; always a room type of `property_id`.
    pub room_type_id: RoomTypeId,
    /// User who created the booking.
    pub created_by: UserId,
    /// Lead guest name.
    pub guest_name: String,
    /// Guest email.
    pub guest_email: Option<String>,
    /// Guest phone number.
    pub guest_phone: Option<String>,
    /// Channel the booking came from.
    pub channel: Option<String>,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date; always after `check_in`.
    pub check_out: NaiveDate,
    /// Derived: calendar nights.
    pub nights: i64,
    /// Number of adults; at least one.
    pub adults: u32,
    /// Number of children.
    pub children: u32,
    /// Gross amount charged.
    pub total_amount: Decimal,
    /// Channel commission.
    pub commission: Option<Decimal>,
    /// Derived: total less commission.
    pub net_revenue: Decimal,
    /// Amount already received.
    pub amount_paid: Decimal,
    /// Derived: amount still owed, direction-dependent.
    pub outstanding_balance: Decimal,
    /// Expected payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Collection direction.
    pub payment_type: PaymentType,
    /// Stay status.
    pub status: BookingStatus,
    /// Set while a booking-grouped invoice covers this booking.
    pub is_invoiced: bool,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Inputs of the financial derivation, taken from the stored fields.
    #[must_use]
    pub fn financial_inputs(&self) -> FinancialInputs {
        FinancialInputs {
            check_in: self.check_in,
            check_out: self.check_out,
            total_amount: self.total_amount,
            commission: self.commission,
            amount_paid: self.amount_paid,
            payment_type: self.payment_type,
        }
    }

    /// Overwrites the derived fields.
    pub fn apply_figures(&mut self, figures: BookingFigures) {
        self.nights = figures.nights;
        self.net_revenue = figures.net_revenue;
        self.outstanding_balance = figures.outstanding_balance;
    }
}

/// Input for creating a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingInput {
    /// Property to book.
    pub property_id: PropertyId,
    /// Room type to book.
    pub room_type_id: RoomTypeId,
    /// Lead guest name.
    pub guest_name: String,
    /// Guest email.
    #[serde(default)]
    pub guest_email: Option<String>,
    /// Guest phone number.
    #[serde(default)]
    pub guest_phone: Option<String>,
    /// Channel the booking came from.
    #[serde(default)]
    pub channel: Option<String>,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date.
    pub check_out: NaiveDate,
    /// Number of adults.
    pub adults: u32,
    /// Number of children.
    #[serde(default)]
    pub children: u32,
    /// Gross amount charged.
    pub total_amount: Decimal,
    /// Channel commission.
    #[serde(default)]
    pub commission: Option<Decimal>,
    /// Amount already received; zero when absent.
    #[serde(default)]
    pub amount_paid: Option<Decimal>,
    /// Expected payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Collection direction.
    pub payment_type: PaymentType,
    /// Initial status; `PENDING` when absent.
    #[serde(default)]
    pub status: Option<BookingStatus>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Patch for an existing booking. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBookingInput {
    /// Move the booking to another property.
    pub property_id: Option<PropertyId>,
    /// Change the room type.
    pub room_type_id: Option<RoomTypeId>,
    /// Lead guest name.
    pub guest_name: Option<String>,
    /// Guest email.
    pub guest_email: Option<String>,
    /// Guest phone number.
    pub guest_phone: Option<String>,
    /// Channel the booking came from.
    pub channel: Option<String>,
    /// Arrival date.
    pub check_in: Option<NaiveDate>,
    /// Departure date.
    pub check_out: Option<NaiveDate>,
    /// Number of adults.
    pub adults: Option<u32>,
    /// Number of children.
    pub children: Option<u32>,
    /// Gross amount charged.
    pub total_amount: Option<Decimal>,
    /// Channel commission.
    pub commission: Option<Decimal>,
    /// Amount already received.
    pub amount_paid: Option<Decimal>,
    /// Expected payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Collection direction.
    pub payment_type: Option<PaymentType>,
    /// Stay status.
    pub status: Option<BookingStatus>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl UpdateBookingInput {
    /// Returns true if the patch touches an input of the financial derivation.
    #[must_use]
    pub fn touches_figures(&self) -> bool {
        self.check_in.is_some()
            || self.check_out.is_some()
            || self.total_amount.is_some()
            || self.commission.is_some()
            || self.amount_paid.is_some()
            || self.payment_type.is_some()
    }

    /// Returns true if the patch changes a figure an invoice item snapshots,
    /// or the collection direction an invoice was grouped by.
    #[must_use]
    pub fn changes_invoiced_terms(&self, booking: &Booking) -> bool {
        self.total_amount.is_some_and(|t| t != booking.total_amount)
            || self.commission.is_some_and(|c| Some(c) != booking.commission)
            || self.payment_type.is_some_and(|p| p != booking.payment_type)
    }

    /// Returns true if the patch changes where the booking lives.
    #[must_use]
    pub fn touches_placement(&self) -> bool {
        self.property_id.is_some() || self.room_type_id.is_some()
    }
}

/// Filters for listing bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingFilter {
    /// Narrow a super admin's listing to one tenant. Ignored for other roles.
    pub tenant_id: Option<TenantId>,
    /// Only bookings of this property.
    pub property_id: Option<PropertyId>,
    /// Only bookings in this status.
    pub status: Option<BookingStatus>,
    /// Only bookings with this collection direction.
    pub payment_type: Option<PaymentType>,
    /// Only invoiced (or not invoiced) bookings.
    pub is_invoiced: Option<bool>,
    /// Check-in on or after this date.
    pub check_in_from: Option<NaiveDate>,
    /// Check-in on or before this date.
    pub check_in_to: Option<NaiveDate>,
}

impl BookingFilter {
    /// Returns true if the booking passes every set filter.
    ///
    /// `tenant_id` is not evaluated here; tenant visibility is a scope concern.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.property_id.is_none_or(|id| booking.property_id == id)
            && self.status.is_none_or(|s| booking.status == s)
            && self.payment_type.is_none_or(|t| booking.payment_type == t)
            && self.is_invoiced.is_none_or(|f| booking.is_invoiced == f)
            && self.check_in_from.is_none_or(|d| booking.check_in >= d)
            && self.check_in_to.is_none_or(|d| booking.check_in <= d)
    }
}

/// Options of the booking service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingOptions {
    /// Reject status writes that do not follow the stay graph.
    pub enforce_status_transitions: bool,
}

impl From<&staydesk_shared::BookingConfig> for BookingOptions {
    fn from(config: &staydesk_shared::BookingConfig) -> Self {
        Self {
            enforce_status_transitions: config.enforce_status_transitions,
        }
    }
}
