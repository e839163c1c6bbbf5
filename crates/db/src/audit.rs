//! In-memory audit sink.

use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use staydesk_core::audit::{AuditAction, AuditEvent, AuditSink};

/// Collects audit events in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded event.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events recorded for one resource.
    pub fn events_for(&self, resource_id: impl Into<Uuid>) -> Vec<AuditEvent> {
        let resource_id = resource_id.into();
        self.events()
            .into_iter()
            .filter(|e| e.resource_id == resource_id)
            .collect()
    }

    /// Actions recorded for one resource.
    pub fn actions_for(&self, resource_id: impl Into<Uuid>) -> Vec<AuditAction> {
        self.events_for(resource_id)
            .into_iter()
            .map(|e| e.action)
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
