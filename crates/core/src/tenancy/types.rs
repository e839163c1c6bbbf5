//! Tenancy domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use staydesk_shared::Role;
use staydesk_shared::types::{PropertyId, RoomTypeId, TenantId, UserId};

/// A hotel-operator account; the root of data isolation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant id.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
}

/// A user of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: UserId,
    /// Owning tenant. Absent for `SUPER_ADMIN`.
    pub tenant_id: Option<TenantId>,
    /// Role of the user.
    pub role: Role,
    /// Full name.
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Inactive users cannot be referenced by new records.
    pub is_active: bool,
}

impl User {
    /// Returns true if the user is active and belongs to `tenant_id`.
    #[must_use]
    pub fn is_active_member_of(&self, tenant_id: TenantId) -> bool {
        self.is_active && self.tenant_id == Some(tenant_id)
    }
}

/// A property (hotel, guest house, ...) operated by a tenant.
///
/// `tenant_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property id.
    pub id: PropertyId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Manager or partner holding scheduling rights over the property.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// When the property was created.
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// Returns true if `user_id` owns this property.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }
}

/// A sellable room category of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    /// Room type id.
    pub id: RoomTypeId,
    /// Owning tenant; always equal to the property's tenant.
    pub tenant_id: TenantId,
    /// Property this room type belongs to.
    pub property_id: PropertyId,
    /// Display name.
    pub name: String,
    /// Default nightly rate.
    pub base_rate: Decimal,
}

impl RoomType {
    /// Returns true if this room type is part of `property`.
    #[must_use]
    pub fn belongs_to(&self, property: &Property) -> bool {
        self.property_id == property.id && self.tenant_id == property.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn property(tenant_id: TenantId, owner_id: Option<UserId>) -> Property {
        Property {
            id: PropertyId::new(),
            tenant_id,
            owner_id,
            name: "Harbour View".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_property_ownership() {
        let owner = UserId::new();
        let prop = property(TenantId::new(), Some(owner));
        assert!(prop.is_owned_by(owner));
        assert!(!prop.is_owned_by(UserId::new()));

        let unowned = property(TenantId::new(), None);
        assert!(!unowned.is_owned_by(owner));
    }

    #[test]
    fn test_room_type_belongs_to_property() {
        let tenant = TenantId::new();
        let prop = property(tenant, None);
        let room = RoomType {
            id: RoomTypeId::new(),
            tenant_id: tenant,
            property_id: prop.id,
            name: "Deluxe".to_string(),
            base_rate: dec!(120),
        };
        assert!(room.belongs_to(&prop));

        let other = property(tenant, None);
        assert!(!room.belongs_to(&other));

        let foreign = RoomType {
            tenant_id: TenantId::new(),
            ..room
        };
        assert!(!foreign.belongs_to(&prop));
    }

    #[test]
    fn test_user_active_membership() {
        let tenant = TenantId::new();
        let mut user = User {
            id: UserId::new(),
            tenant_id: Some(tenant),
            role: Role::Staff,
            full_name: "Front Desk".to_string(),
            email: "desk@example.com".to_string(),
            is_active: true,
        };
        assert!(user.is_active_member_of(tenant));
        assert!(!user.is_active_member_of(TenantId::new()));

        user.is_active = false;
        assert!(!user.is_active_member_of(tenant));
    }
}
