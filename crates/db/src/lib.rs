//! Persistence layer for Staydesk.
//!
//! This crate provides:
//! - `MemoryStore`, a transactional in-memory implementation of the core
//!   store contract with a unique invoice-number index and fault injection
//! - `MemoryAuditSink`, an audit sink collecting events for inspection

pub mod audit;
pub mod memory;

pub use audit::MemoryAuditSink;
pub use memory::{FailPoint, MemoryStore, MemoryTx};
