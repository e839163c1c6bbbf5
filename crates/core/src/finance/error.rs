//! Financial derivation error types.

use thiserror::Error;

/// Errors raised while deriving monetary figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FinanceError {
    /// A derived amount does not fit the decimal range.
    #[error("Amount overflow while computing {figure}")]
    AmountOverflow {
        /// The figure being computed.
        figure: &'static str,
    },
}

impl FinanceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AmountOverflow { .. } => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        }
    }
}
