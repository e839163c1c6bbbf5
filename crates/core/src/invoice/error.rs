//! Invoice error types.

use thiserror::Error;
use uuid::Uuid;

use staydesk_shared::AppError;
use staydesk_shared::types::InvoiceId;

use super::types::InvoiceStatus;
use crate::access::AccessError;
use crate::finance::FinanceError;
use crate::store::StoreError;

/// Errors that can occur during invoice operations.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// No member ids were supplied.
    #[error("An invoice needs at least one member")]
    EmptyInvoice,

    /// The same member id was supplied more than once.
    #[error("Duplicate invoice members: {}", join_ids(.ids))]
    DuplicateMembers {
        /// Every repeated id, sorted.
        ids: Vec<Uuid>,
    },

    /// Some members are absent, in another tenant, or not eligible.
    #[error("Invoice members not found or not eligible: {}", join_ids(.ids))]
    MembersNotFound {
        /// Every failing id, sorted.
        ids: Vec<Uuid>,
    },

    /// Members belong to more than one tenant.
    #[error("Invoice members span more than one tenant")]
    MixedTenants,

    /// No unique invoice number could be allocated.
    #[error("Could not allocate a unique invoice number after {attempts} attempts; retry")]
    NumberCollision {
        /// Numbers tried.
        attempts: u32,
    },

    /// Invoice is void or cancelled.
    #[error("Invoice is {status}; no further status change is accepted")]
    TerminalStatus {
        /// Current status.
        status: InvoiceStatus,
    },

    /// Paid invoices cannot move back.
    #[error("Paid invoice cannot be changed to {to}")]
    PaidInvoiceImmutable {
        /// Attempted status.
        to: InvoiceStatus,
    },

    /// Invoice cannot be cancelled in its current status.
    #[error("Invoice in status {status} cannot be cancelled")]
    CannotCancel {
        /// Current status.
        status: InvoiceStatus,
    },

    /// The invoice total does not fit the decimal range.
    #[error(transparent)]
    AmountOverflow(#[from] FinanceError),

    /// Invoice not found in the actor's tenant.
    #[error("Invoice {0} not found")]
    NotFound(InvoiceId),

    /// Authorization failure.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl InvoiceError {
    /// Returns true if repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NumberCollision { .. })
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MembersNotFound { .. } | Self::NotFound(_) => 404,

            Self::EmptyInvoice
            | Self::DuplicateMembers { .. }
            | Self::MixedTenants
            | Self::NumberCollision { .. }
            | Self::TerminalStatus { .. }
            | Self::PaidInvoiceImmutable { .. }
            | Self::CannotCancel { .. } => 400,

            Self::AmountOverflow(err) => err.status_code(),
            Self::Access(err) => err.status_code(),
            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInvoice => "EMPTY_INVOICE",
            Self::DuplicateMembers { .. } => "DUPLICATE_MEMBERS",
            Self::MembersNotFound { .. } => "MEMBERS_NOT_FOUND",
            Self::MixedTenants => "MIXED_TENANTS",
            Self::NumberCollision { .. } => "INVOICE_NUMBER_COLLISION",
            Self::TerminalStatus { .. } => "TERMINAL_STATUS",
            Self::PaidInvoiceImmutable { .. } => "PAID_INVOICE_IMMUTABLE",
            Self::CannotCancel { .. } => "CANNOT_CANCEL",
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::AmountOverflow(err) => err.error_code(),
            Self::Access(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Access(err) => err.into(),
            InvoiceError::Store(err) => err.into(),
            other => Self::from_status(other.status_code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_not_found_lists_every_id() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let err = InvoiceError::MembersNotFound { ids: vec![a, b] };
        let message = err.to_string();
        assert!(message.contains(&a.to_string()));
        assert!(message.contains(&b.to_string()));
        assert_eq!(err.status_code(), 404);
        assert!(matches!(AppError::from(err), AppError::NotFound(_)));
    }

    #[test]
    fn test_collision_is_retryable_bad_request() {
        let err = InvoiceError::NumberCollision { attempts: 3 };
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), 400);
        assert!(matches!(AppError::from(err), AppError::BadRequest(_)));
        assert!(!InvoiceError::EmptyInvoice.is_retryable());
    }

    #[test]
    fn test_status_errors() {
        let err = InvoiceError::PaidInvoiceImmutable {
            to: InvoiceStatus::Sent,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "PAID_INVOICE_IMMUTABLE");

        let err = InvoiceError::CannotCancel {
            status: InvoiceStatus::Void,
        };
        assert!(err.to_string().contains("VOID"));
    }

    #[test]
    fn test_overflow_is_bad_request() {
        let err = InvoiceError::from(FinanceError::AmountOverflow {
            figure: "totalAmount",
        });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "AMOUNT_OVERFLOW");
        assert!(!err.is_retryable());
        assert!(matches!(AppError::from(err), AppError::BadRequest(_)));
    }
}
