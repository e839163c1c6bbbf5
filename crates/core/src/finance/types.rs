//! Financial domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection direction: who receives the guest's money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// The property collects the full amount from the guest.
    HotelCollect,
    /// A distribution channel collects from the guest and remits to the
    /// property later, net of its commission.
    OtaCollect,
}

impl PaymentType {
    /// Returns the string representation of the collection direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HotelCollect => "HOTEL_COLLECT",
            Self::OtaCollect => "OTA_COLLECT",
        }
    }

    /// Parses a collection direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "HOTEL_COLLECT" => Some(Self::HotelCollect),
            "OTA_COLLECT" => Some(Self::OtaCollect),
            _ => None,
        }
    }

    /// Returns true if a channel collects on the property's behalf.
    #[must_use]
    pub const fn is_channel_collected(&self) -> bool {
        matches!(self, Self::OtaCollect)
    }

    /// Payment methods accepted for this direction.
    #[must_use]
    pub const fn allowed_methods(&self) -> &'static [PaymentMethod] {
        match self {
            Self::HotelCollect => &PaymentMethod::HOTEL_SIDE,
            Self::OtaCollect => &PaymentMethod::OTA_SIDE,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How money changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash at the desk.
    Cash,
    /// Card terminal.
    Card,
    /// Bank transfer.
    BankTransfer,
    /// UPI transfer.
    Upi,
    /// Cheque.
    Cheque,
    /// Single-use card issued by a channel.
    VirtualCard,
    /// Settlement into the channel's wallet.
    OtaWallet,
}

impl PaymentMethod {
    /// Methods a property can collect directly.
    pub const HOTEL_SIDE: [Self; 5] = [
        Self::Cash,
        Self::Card,
        Self::BankTransfer,
        Self::Upi,
        Self::Cheque,
    ];

    /// Methods a channel remits with.
    pub const OTA_SIDE: [Self; 3] = [Self::BankTransfer, Self::VirtualCard, Self::OtaWallet];

    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Upi => "UPI",
            Self::Cheque => "CHEQUE",
            Self::VirtualCard => "VIRTUAL_CARD",
            Self::OtaWallet => "OTA_WALLET",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Some(Self::Cash),
            "CARD" => Some(Self::Card),
            "BANK_TRANSFER" => Some(Self::BankTransfer),
            "UPI" => Some(Self::Upi),
            "CHEQUE" => Some(Self::Cheque),
            "VIRTUAL_CARD" => Some(Self::VirtualCard),
            "OTA_WALLET" => Some(Self::OtaWallet),
            _ => None,
        }
    }

    /// Returns true if the method is valid for the collection direction.
    #[must_use]
    pub fn is_allowed_for(&self, payment_type: PaymentType) -> bool {
        payment_type.allowed_methods().contains(self)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of the booking derivation.
///
/// Dates are expected to be validated (`check_out > check_in`) beforehand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialInputs {
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date.
    pub check_out: NaiveDate,
    /// Gross amount charged to the guest.
    pub total_amount: Decimal,
    /// Channel commission; zero when absent.
    pub commission: Option<Decimal>,
    /// Amount already received by the property.
    pub amount_paid: Decimal,
    /// Collection direction.
    pub payment_type: PaymentType,
}

/// Fields derived from [`FinancialInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFigures {
    /// Calendar nights between check-in and check-out.
    pub nights: i64,
    /// Total amount less commission.
    pub net_revenue: Decimal,
    /// Amount still owed to the property.
    pub outstanding_balance: Decimal,
}
