//! Authorization domain types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use staydesk_shared::Actor;
use staydesk_shared::types::{PropertyId, TenantId, UserId};

use crate::tenancy::Property;

/// The kind of operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Read a resource.
    Read,
    /// Create a resource.
    Create,
    /// Modify a resource.
    Update,
    /// Delete or cancel a resource.
    Delete,
}

impl Operation {
    /// Returns true for create, update and delete.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

/// The kind of resource at the head of an ownership chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A property.
    Property,
    /// A room type.
    RoomType,
    /// A booking.
    Booking,
    /// A payment.
    Payment,
    /// An invoice.
    Invoice,
    /// A user.
    User,
}

impl ResourceKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::RoomType => "room type",
            Self::Booking => "booking",
            Self::Payment => "payment",
            Self::Invoice => "invoice",
            Self::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a property that matters for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    /// Property id.
    pub id: PropertyId,
    /// Tenant of the property.
    pub tenant_id: TenantId,
    /// Owning manager or partner.
    pub owner_id: Option<UserId>,
}

impl From<&Property> for PropertyRef {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id,
            tenant_id: property.tenant_id,
            owner_id: property.owner_id,
        }
    }
}

/// A resource and every property reachable from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChain {
    /// Kind of the resource.
    pub kind: ResourceKind,
    /// Id of the resource.
    pub resource_id: Uuid,
    /// Tenant the resource belongs to.
    pub tenant_id: TenantId,
    /// Properties reachable through the chain.
    pub properties: Vec<PropertyRef>,
}

impl ResourceChain {
    /// Chain of a property itself.
    #[must_use]
    pub fn property(property: &Property) -> Self {
        Self {
            kind: ResourceKind::Property,
            resource_id: property.id.into_inner(),
            tenant_id: property.tenant_id,
            properties: vec![property.into()],
        }
    }

    /// Chain of a resource hanging off a single property
    /// (Booking → Property, Payment → Booking → Property).
    #[must_use]
    pub fn through_property(
        kind: ResourceKind,
        resource_id: impl Into<Uuid>,
        tenant_id: TenantId,
        property: &Property,
    ) -> Self {
        Self {
            kind,
            resource_id: resource_id.into(),
            tenant_id,
            properties: vec![property.into()],
        }
    }

    /// Chain of a resource reaching several properties (Invoice → members).
    #[must_use]
    pub fn through_properties<'a>(
        kind: ResourceKind,
        resource_id: impl Into<Uuid>,
        tenant_id: TenantId,
        properties: impl IntoIterator<Item = &'a Property>,
    ) -> Self {
        let mut refs: Vec<PropertyRef> = properties.into_iter().map(PropertyRef::from).collect();
        refs.sort_by_key(|p| p.id);
        refs.dedup_by_key(|p| p.id);
        Self {
            kind,
            resource_id: resource_id.into(),
            tenant_id,
            properties: refs,
        }
    }

    /// Returns true if every reachable property shares the resource's tenant.
    #[must_use]
    pub fn is_tenant_consistent(&self) -> bool {
        self.properties.iter().all(|p| p.tenant_id == self.tenant_id)
    }
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The resource belongs to another tenant.
    CrossTenant,
    /// The actor is not bound to any tenant.
    MissingTenant,
    /// The actor does not own every property reachable from the resource.
    NotOwner,
    /// No property is reachable, so ownership cannot be established.
    NoReachableProperty,
    /// The actor's role may only read.
    ReadOnlyRole,
    /// No policy is registered for the actor's role.
    NoPolicy,
}

impl DenyReason {
    /// Returns true if the denial must be reported as absence so the
    /// existence of another tenant's data is not revealed.
    #[must_use]
    pub const fn hides_existence(&self) -> bool {
        matches!(self, Self::CrossTenant)
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CrossTenant => "cross-tenant access",
            Self::MissingTenant => "actor is not bound to a tenant",
            Self::NotOwner => "actor does not own every property involved",
            Self::NoReachableProperty => "no property is reachable from the resource",
            Self::ReadOnlyRole => "role is read-only",
            Self::NoPolicy => "no access policy for role",
        };
        f.write_str(text)
    }
}

/// Outcome of an access evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Access granted.
    Allow {
        /// Tenant the resource belongs to.
        tenant_id: TenantId,
    },
    /// Access refused.
    Deny {
        /// Tenant the resource belongs to.
        tenant_id: TenantId,
        /// Why access was refused.
        reason: DenyReason,
    },
}

impl Decision {
    /// Returns true if access was granted.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Tenant the evaluated resource belongs to.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        match self {
            Self::Allow { tenant_id } | Self::Deny { tenant_id, .. } => *tenant_id,
        }
    }

    /// The denial reason, if any.
    #[must_use]
    pub const fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow { .. } => None,
            Self::Deny { reason, .. } => Some(*reason),
        }
    }
}

/// Tenant filter applied to lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Every tenant; only for `SUPER_ADMIN`.
    All,
    /// A single tenant.
    Tenant(TenantId),
}

impl TenantScope {
    /// Scope of an actor's lookups.
    ///
    /// A tenant-less actor that is not a super admin gets `None`: it can see
    /// nothing.
    #[must_use]
    pub fn for_actor(actor: &Actor) -> Option<Self> {
        if actor.is_super_admin() {
            Some(Self::All)
        } else {
            actor.tenant_id.map(Self::Tenant)
        }
    }

    /// Returns true if `tenant_id` is visible in this scope.
    #[must_use]
    pub fn contains(&self, tenant_id: TenantId) -> bool {
        match self {
            Self::All => true,
            Self::Tenant(scoped) => *scoped == tenant_id,
        }
    }
}

/// Visibility applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListScope {
    /// Tenants visible to the actor.
    pub tenant: TenantScope,
    /// Restrict to resources on properties owned by this user.
    pub owner: Option<UserId>,
}
