//! Audit sinks.

use tracing::info;

use super::types::AuditEvent;

/// Receives audit events after the mutation they describe has committed.
pub trait AuditSink: Send + Sync {
    /// Records an event. Must not fail the caller.
    fn record(&self, event: AuditEvent);
}

/// Writes audit events to the `audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        info!(
            target: "audit",
            action = %event.action,
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            actor_id = %event.actor_id,
            tenant_id = %event.tenant_id,
            before = ?event.before,
            after = ?event.after,
            occurred_at = %event.occurred_at,
            "Audit event"
        );
    }
}
