//! Persistence collaborator contract.
//!
//! The core never talks to a database directly. It opens a transaction on a
//! [`Store`], reads and writes through the [`StoreTx`] it gets back, and
//! commits. Dropping a transaction without committing discards its writes.
//!
//! # Modules
//!
//! - `repository` - The `Store` and `StoreTx` traits
//! - `types` - List queries
//! - `error` - Persistence errors

pub mod error;
pub mod repository;
pub mod types;

pub use error::StoreError;
pub use repository::{Store, StoreTx};
pub use types::{BookingQuery, InvoiceQuery, PaymentQuery};
