//! Property-based tests for AccessEvaluator.
//!
//! - Only `SUPER_ADMIN` ever crosses a tenant boundary
//! - Property-scoped roles need ownership of every reachable property
//! - `STAFF` never writes

use proptest::prelude::*;
use uuid::Uuid;

use staydesk_shared::types::{PropertyId, TenantId, UserId};
use staydesk_shared::{Actor, Role};

use super::evaluator::AccessEvaluator;
use super::types::{DenyReason, Operation, PropertyRef, ResourceChain, ResourceKind};

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::SuperAdmin),
        Just(Role::Admin),
        Just(Role::Manager),
        Just(Role::Partner),
        Just(Role::Staff),
    ]
}

fn arb_op() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Read),
        Just(Operation::Create),
        Just(Operation::Update),
        Just(Operation::Delete),
    ]
}

/// Builds a chain whose properties are owned by `actor` where the mask is true.
fn chain_with_owners(tenant_id: TenantId, actor: UserId, owned: &[bool]) -> ResourceChain {
    ResourceChain {
        kind: ResourceKind::Invoice,
        resource_id: Uuid::new_v4(),
        tenant_id,
        properties: owned
            .iter()
            .map(|mine| PropertyRef {
                id: PropertyId::new(),
                tenant_id,
                owner_id: Some(if *mine { actor } else { UserId::new() }),
            })
            .collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A tenant-bound actor never reaches another tenant's resource.
    #[test]
    fn prop_no_cross_tenant_access(
        role in arb_role(),
        op in arb_op(),
        owned in proptest::collection::vec(any::<bool>(), 0..5),
    ) {
        let evaluator = AccessEvaluator::standard();
        let actor_id = UserId::new();
        let actor = Actor { id: actor_id, tenant_id: Some(TenantId::new()), role };
        let chain = chain_with_owners(TenantId::new(), actor_id, &owned);

        let decision = evaluator.evaluate(&actor, &chain, op);
        if role == Role::SuperAdmin {
            prop_assert!(decision.is_allowed());
        } else {
            prop_assert_eq!(decision.deny_reason(), Some(DenyReason::CrossTenant));
        }
        prop_assert_eq!(decision.tenant_id(), chain.tenant_id);
    }

    /// Manager and partner access is all-or-nothing over reachable properties.
    #[test]
    fn prop_ownership_all_or_nothing(
        partner in any::<bool>(),
        op in arb_op(),
        owned in proptest::collection::vec(any::<bool>(), 1..6),
    ) {
        let evaluator = AccessEvaluator::standard();
        let tenant = TenantId::new();
        let actor_id = UserId::new();
        let role = if partner { Role::Partner } else { Role::Manager };
        let actor = Actor::new(actor_id, tenant, role);
        let chain = chain_with_owners(tenant, actor_id, &owned);

        let allowed = evaluator.evaluate(&actor, &chain, op).is_allowed();
        prop_assert_eq!(allowed, owned.iter().all(|mine| *mine));
    }

    /// Staff is allowed exactly the in-tenant reads.
    #[test]
    fn prop_staff_read_only(
        op in arb_op(),
        owned in proptest::collection::vec(any::<bool>(), 0..4),
    ) {
        let evaluator = AccessEvaluator::standard();
        let tenant = TenantId::new();
        let actor = Actor::new(UserId::new(), tenant, Role::Staff);
        let chain = chain_with_owners(tenant, actor.id, &owned);

        let decision = evaluator.evaluate(&actor, &chain, op);
        prop_assert_eq!(decision.is_allowed(), !op.is_write());
    }

    /// Admin is allowed everything inside its tenant.
    #[test]
    fn prop_admin_tenant_wide(
        op in arb_op(),
        owned in proptest::collection::vec(any::<bool>(), 0..4),
    ) {
        let evaluator = AccessEvaluator::standard();
        let tenant = TenantId::new();
        let actor = Actor::new(UserId::new(), tenant, Role::Admin);
        let chain = chain_with_owners(tenant, UserId::new(), &owned);
        prop_assert!(evaluator.evaluate(&actor, &chain, op).is_allowed());
    }
}
