//! The role → policy table.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use staydesk_shared::types::TenantId;
use staydesk_shared::{Actor, Role};

use super::error::AccessError;
use super::policy::{AccessPolicy, CheckedPolicy, PropertyOwnership, ReadOnly, SameTenant};
use super::types::{Decision, DenyReason, ListScope, Operation, ResourceChain, TenantScope};

/// Evaluates access by dispatching to the policy registered for the
/// actor's role.
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    policies: HashMap<Role, Arc<dyn AccessPolicy>>,
}

impl Default for AccessEvaluator {
    fn default() -> Self {
        Self::standard()
    }
}

impl AccessEvaluator {
    /// Creates an evaluator without any policy; every role is denied.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    /// The standard role table.
    ///
    /// | Role | Checks |
    /// |------|--------|
    /// | `SUPER_ADMIN` | none |
    /// | `ADMIN` | same tenant |
    /// | `MANAGER`, `PARTNER` | same tenant, owns every property |
    /// | `STAFF` | same tenant, read only |
    #[must_use]
    pub fn standard() -> Self {
        let owner_scoped: Arc<dyn AccessPolicy> = Arc::new(
            CheckedPolicy::new()
                .then(SameTenant)
                .then(PropertyOwnership),
        );
        Self::empty()
            .with_policy(Role::SuperAdmin, CheckedPolicy::new())
            .with_policy(Role::Admin, CheckedPolicy::new().then(SameTenant))
            .with_shared_policy(Role::Manager, Arc::clone(&owner_scoped))
            .with_shared_policy(Role::Partner, owner_scoped)
            .with_policy(
                Role::Staff,
                CheckedPolicy::new().then(SameTenant).then(ReadOnly),
            )
    }

    /// Registers (or replaces) the policy of a role.
    #[must_use]
    pub fn with_policy(self, role: Role, policy: impl AccessPolicy + 'static) -> Self {
        self.with_shared_policy(role, Arc::new(policy))
    }

    /// Registers (or replaces) a shared policy for a role.
    #[must_use]
    pub fn with_shared_policy(mut self, role: Role, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policies.insert(role, policy);
        self
    }

    /// Evaluates access without converting the outcome into an error.
    #[must_use]
    pub fn evaluate(&self, actor: &Actor, chain: &ResourceChain, op: Operation) -> Decision {
        let decision = match self.policies.get(&actor.role) {
            Some(policy) => policy.can_access(actor, chain, op),
            None => Decision::Deny {
                tenant_id: chain.tenant_id,
                reason: DenyReason::NoPolicy,
            },
        };
        debug!(
            actor_id = %actor.id,
            role = %actor.role,
            resource = %chain.kind,
            resource_id = %chain.resource_id,
            ?op,
            allowed = decision.is_allowed(),
            "Access evaluated"
        );
        decision
    }

    /// Evaluates access and returns the resource's tenant when allowed.
    ///
    /// # Errors
    ///
    /// Cross-tenant denials become [`AccessError::NotFound`]; every other
    /// denial is [`AccessError::Forbidden`].
    pub fn authorize(
        &self,
        actor: &Actor,
        chain: &ResourceChain,
        op: Operation,
    ) -> Result<TenantId, AccessError> {
        match self.evaluate(actor, chain, op) {
            Decision::Allow { tenant_id } => Ok(tenant_id),
            Decision::Deny { reason, .. } => {
                warn!(
                    actor_id = %actor.id,
                    role = %actor.role,
                    resource = %chain.kind,
                    resource_id = %chain.resource_id,
                    ?op,
                    %reason,
                    "Access denied"
                );
                if reason.hides_existence() {
                    Err(AccessError::NotFound {
                        kind: chain.kind,
                        id: chain.resource_id,
                    })
                } else {
                    Err(AccessError::Forbidden {
                        kind: chain.kind,
                        id: chain.resource_id,
                        reason,
                    })
                }
            }
        }
    }

    /// Rejects read-only roles before any lookup happens.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::ReadOnlyRole`] for roles that cannot write.
    pub fn require_writer(&self, actor: &Actor) -> Result<(), AccessError> {
        if actor.role.can_write() {
            Ok(())
        } else {
            warn!(actor_id = %actor.id, role = %actor.role, "Write attempted by read-only role");
            Err(AccessError::ReadOnlyRole(actor.role))
        }
    }

    /// Requires the actor to hold exactly `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::RoleRequired`] otherwise.
    pub fn require_role(&self, actor: &Actor, role: Role) -> Result<(), AccessError> {
        if actor.role == role {
            Ok(())
        } else {
            warn!(
                actor_id = %actor.id,
                role = %actor.role,
                required = %role,
                "Role requirement not met"
            );
            Err(AccessError::RoleRequired {
                required: role,
                actual: actor.role,
            })
        }
    }

    /// Tenant filter for single-resource lookups.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingTenant`] for a tenant-less actor that is
    /// not a super admin.
    pub fn lookup_scope(&self, actor: &Actor) -> Result<TenantScope, AccessError> {
        TenantScope::for_actor(actor).ok_or(AccessError::MissingTenant)
    }

    /// Visibility for list queries.
    ///
    /// Property-scoped roles only see resources on properties they own.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingTenant`] for a tenant-less actor that is
    /// not a super admin.
    pub fn list_scope(&self, actor: &Actor) -> Result<ListScope, AccessError> {
        let tenant = self.lookup_scope(actor)?;
        let owner = actor.role.is_property_scoped().then_some(actor.id);
        Ok(ListScope { tenant, owner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::types::{PropertyRef, ResourceKind};
    use staydesk_shared::types::{PropertyId, UserId};
    use uuid::Uuid;

    fn chain(tenant_id: TenantId, owner_id: Option<UserId>) -> ResourceChain {
        ResourceChain {
            kind: ResourceKind::Booking,
            resource_id: Uuid::new_v4(),
            tenant_id,
            properties: vec![PropertyRef {
                id: PropertyId::new(),
                tenant_id,
                owner_id,
            }],
        }
    }

    #[test]
    fn test_super_admin_reaches_every_tenant() {
        let evaluator = AccessEvaluator::standard();
        let actor = Actor::super_admin(UserId::new());
        let tenant = TenantId::new();
        assert_eq!(
            evaluator.authorize(&actor, &chain(tenant, None), Operation::Delete).ok(),
            Some(tenant)
        );
    }

    #[test]
    fn test_admin_cross_tenant_is_not_found() {
        let evaluator = AccessEvaluator::standard();
        let actor = Actor::new(UserId::new(), TenantId::new(), Role::Admin);
        let err = evaluator
            .authorize(&actor, &chain(TenantId::new(), None), Operation::Read)
            .unwrap_err();
        assert!(matches!(err, AccessError::NotFound { kind: ResourceKind::Booking, .. }));
    }

    #[test]
    fn test_manager_needs_ownership() {
        let evaluator = AccessEvaluator::standard();
        let tenant = TenantId::new();
        let me = UserId::new();
        let actor = Actor::new(me, tenant, Role::Manager);

        assert!(evaluator.authorize(&actor, &chain(tenant, Some(me)), Operation::Update).is_ok());
        let err = evaluator
            .authorize(&actor, &chain(tenant, Some(UserId::new())), Operation::Read)
            .unwrap_err();
        assert!(matches!(
            err,
            AccessError::Forbidden {
                reason: DenyReason::NotOwner,
                ..
            }
        ));
    }

    #[test]
    fn test_partner_shares_manager_policy() {
        let evaluator = AccessEvaluator::standard();
        let tenant = TenantId::new();
        let me = UserId::new();
        let actor = Actor::new(me, tenant, Role::Partner);
        assert!(evaluator.evaluate(&actor, &chain(tenant, Some(me)), Operation::Create).is_allowed());
        assert!(!evaluator.evaluate(&actor, &chain(tenant, None), Operation::Read).is_allowed());
    }

    #[test]
    fn test_staff_reads_but_cannot_write() {
        let evaluator = AccessEvaluator::standard();
        let tenant = TenantId::new();
        let actor = Actor::new(UserId::new(), tenant, Role::Staff);
        assert!(evaluator.authorize(&actor, &chain(tenant, None), Operation::Read).is_ok());
        assert!(matches!(
            evaluator.authorize(&actor, &chain(tenant, None), Operation::Update),
            Err(AccessError::Forbidden {
                reason: DenyReason::ReadOnlyRole,
                ..
            })
        ));
        assert!(evaluator.require_writer(&actor).is_err());
    }

    #[test]
    fn test_missing_policy_denies() {
        let evaluator = AccessEvaluator::empty();
        let actor = Actor::super_admin(UserId::new());
        let decision = evaluator.evaluate(&actor, &chain(TenantId::new(), None), Operation::Read);
        assert_eq!(decision.deny_reason(), Some(DenyReason::NoPolicy));
    }

    #[test]
    fn test_require_role() {
        let evaluator = AccessEvaluator::standard();
        let admin = Actor::new(UserId::new(), TenantId::new(), Role::Admin);
        assert!(matches!(
            evaluator.require_role(&admin, Role::SuperAdmin),
            Err(AccessError::RoleRequired { .. })
        ));
        assert!(
            evaluator
                .require_role(&Actor::super_admin(UserId::new()), Role::SuperAdmin)
                .is_ok()
        );
    }

    #[test]
    fn test_list_scope() {
        let evaluator = AccessEvaluator::standard();
        let tenant = TenantId::new();
        let manager = Actor::new(UserId::new(), tenant, Role::Manager);
        assert_eq!(
            evaluator.list_scope(&manager).unwrap(),
            ListScope {
                tenant: TenantScope::Tenant(tenant),
                owner: Some(manager.id),
            }
        );

        let staff = Actor::new(UserId::new(), tenant, Role::Staff);
        assert_eq!(evaluator.list_scope(&staff).unwrap().owner, None);

        let orphan = Actor {
            id: UserId::new(),
            tenant_id: None,
            role: Role::Admin,
        };
        assert!(matches!(
            evaluator.list_scope(&orphan),
            Err(AccessError::MissingTenant)
        ));
    }
}
