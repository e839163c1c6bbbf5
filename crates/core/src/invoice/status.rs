//! Invoice status rules.

use super::error::InvoiceError;
use super::types::InvoiceStatus;

/// What a requested status change amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Same status; nothing to write.
    Unchanged,
    /// Plain status write.
    Advance(InvoiceStatus),
    /// Terminal status; grouped members must be released.
    Release(InvoiceStatus),
}

/// Classifies a status change.
///
/// # Errors
///
/// - `TerminalStatus` if the invoice is already void or cancelled
/// - `PaidInvoiceImmutable` when moving a paid invoice to any other status
pub fn plan_status_change(
    current: InvoiceStatus,
    next: InvoiceStatus,
) -> Result<StatusChange, InvoiceError> {
    if current.is_terminal() {
        return Err(InvoiceError::TerminalStatus { status: current });
    }
    if current == next {
        return Ok(StatusChange::Unchanged);
    }
    if current == InvoiceStatus::Paid {
        return Err(InvoiceError::PaidInvoiceImmutable { to: next });
    }
    if next.releases_members() {
        Ok(StatusChange::Release(next))
    } else {
        Ok(StatusChange::Advance(next))
    }
}

/// Checks that an invoice may be cancelled.
///
/// # Errors
///
/// Returns `CannotCancel` for paid, void and cancelled invoices.
pub fn validate_cancel(current: InvoiceStatus) -> Result<(), InvoiceError> {
    match current {
        InvoiceStatus::Paid | InvoiceStatus::Void | InvoiceStatus::Cancelled => {
            Err(InvoiceError::CannotCancel { status: current })
        }
        InvoiceStatus::Draft | InvoiceStatus::Sent => Ok(()),
    }
}
