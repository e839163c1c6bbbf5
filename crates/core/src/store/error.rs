//! Persistence error types.

use thiserror::Error;

use staydesk_shared::AppError;

/// Unique index on invoice numbers.
pub const INVOICE_NUMBER_CONSTRAINT: &str = "invoices_invoice_number_key";

/// Errors raised by a persistence collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint rejected a write.
    #[error("Unique constraint {constraint} violated")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: String,
    },

    /// Any other backend failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if the error is a violation of `constraint`.
    #[must_use]
    pub fn violates(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: c } if c == constraint)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UniqueViolation { .. } => 409,
            Self::Backend(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UniqueViolation { .. } => "UNIQUE_VIOLATION",
            Self::Backend(_) => "DATABASE_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => Self::Conflict(err.to_string()),
            StoreError::Backend(msg) => Self::Database(msg),
        }
    }
}
