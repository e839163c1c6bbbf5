//! Audit event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use staydesk_shared::Actor;
use staydesk_shared::types::{TenantId, UserId};

/// What happened to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Resource created.
    Create,
    /// Resource fields changed.
    Update,
    /// Resource removed.
    Delete,
    /// Resource status changed.
    StatusChange,
    /// Resource cancelled and its members released.
    Cancel,
}

impl AuditAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::StatusChange => "STATUS_CHANGE",
            Self::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of audited resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// A booking.
    Booking,
    /// A payment.
    Payment,
    /// An invoice.
    Invoice,
}

impl ResourceType {
    /// Returns the string representation of the resource type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "BOOKING",
            Self::Payment => "PAYMENT",
            Self::Invoice => "INVOICE",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audited mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened.
    pub action: AuditAction,
    /// Kind of resource.
    pub resource_type: ResourceType,
    /// Id of the resource.
    pub resource_id: Uuid,
    /// Who did it.
    pub actor_id: UserId,
    /// Tenant of the resource.
    pub tenant_id: TenantId,
    /// Snapshot before the mutation.
    pub before: Option<Value>,
    /// Snapshot after the mutation.
    pub after: Option<Value>,
    /// When the mutation was committed.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event without snapshots.
    #[must_use]
    pub fn new(
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: impl Into<Uuid>,
        actor: &Actor,
        tenant_id: TenantId,
    ) -> Self {
        Self {
            action,
            resource_type,
            resource_id: resource_id.into(),
            actor_id: actor.id,
            tenant_id,
            before: None,
            after: None,
            occurred_at: Utc::now(),
        }
    }

    /// Attaches the pre-mutation snapshot.
    ///
    /// A value that fails to serialize is recorded as `null`.
    #[must_use]
    pub fn with_before<T: Serialize>(mut self, value: &T) -> Self {
        self.before = Some(snapshot(value));
        self
    }

    /// Attaches the post-mutation snapshot.
    #[must_use]
    pub fn with_after<T: Serialize>(mut self, value: &T) -> Self {
        self.after = Some(snapshot(value));
        self
    }
}

fn snapshot<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
