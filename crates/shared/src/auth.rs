//! Request principal types.
//!
//! Authentication happens outside the core. What reaches the core is an
//! already-verified [`Actor`], passed explicitly into every call.

use serde::{Deserialize, Serialize};

use crate::types::{TenantId, UserId};

/// Role of a user within the system.
///
/// The role selects an access strategy; it is not a fixed endpoint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform operator; not bound to a tenant.
    SuperAdmin,
    /// Manages a whole tenant.
    Admin,
    /// Manages the properties they own.
    Manager,
    /// External partner operating the properties they own.
    Partner,
    /// Front-desk staff; read-only within the tenant.
    Staff,
}

impl Role {
    /// All roles, highest privilege first.
    pub const ALL: [Self; 5] = [
        Self::SuperAdmin,
        Self::Admin,
        Self::Manager,
        Self::Partner,
        Self::Staff,
    ];

    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SUPER_ADMIN" => Some(Self::SuperAdmin),
            "ADMIN" => Some(Self::Admin),
            "MANAGER" => Some(Self::Manager),
            "PARTNER" => Some(Self::Partner),
            "STAFF" => Some(Self::Staff),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Partner => "PARTNER",
            Self::Staff => "STAFF",
        }
    }

    /// Returns true for roles whose rights are limited to owned properties.
    #[must_use]
    pub const fn is_property_scoped(&self) -> bool {
        matches!(self, Self::Manager | Self::Partner)
    }

    /// Returns true if the role may create, update or delete bookings,
    /// payments and invoices.
    #[must_use]
    pub const fn can_write(&self) -> bool {
        !matches!(self, Self::Staff)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated principal behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id of the actor.
    pub id: UserId,
    /// Tenant the actor belongs to. Absent for `SUPER_ADMIN`.
    pub tenant_id: Option<TenantId>,
    /// Role of the actor.
    pub role: Role,
}

impl Actor {
    /// Creates a tenant-bound actor.
    #[must_use]
    pub const fn new(id: UserId, tenant_id: TenantId, role: Role) -> Self {
        Self {
            id,
            tenant_id: Some(tenant_id),
            role,
        }
    }

    /// Creates a platform-level super admin with no tenant.
    #[must_use]
    pub const fn super_admin(id: UserId) -> Self {
        Self {
            id,
            tenant_id: None,
            role: Role::SuperAdmin,
        }
    }

    /// Returns true if the actor is a super admin.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self.role, Role::SuperAdmin)
    }
}
