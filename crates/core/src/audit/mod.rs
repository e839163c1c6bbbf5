//! Audit trail of mutations.
//!
//! Services emit one [`AuditEvent`] per committed mutation through an
//! [`AuditSink`]. Events are never emitted for rolled-back work.

pub mod sink;
pub mod types;

pub use sink::{AuditSink, TracingAuditSink};
pub use types::{AuditAction, AuditEvent, ResourceType};
