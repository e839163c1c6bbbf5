//! Access checks and the policies composed from them.
//!
//! A policy is an ordered list of checks. The first failing check decides the
//! denial reason, so tenant isolation is always evaluated before ownership.

use std::fmt;

use staydesk_shared::Actor;

use super::types::{Decision, DenyReason, Operation, ResourceChain};

/// A single access rule.
pub trait AccessCheck: Send + Sync + fmt::Debug {
    /// Returns `Err` with the denial reason if the rule fails.
    fn check(&self, actor: &Actor, chain: &ResourceChain, op: Operation) -> Result<(), DenyReason>;
}

/// Decides whether an actor may perform an operation on a resource chain.
pub trait AccessPolicy: Send + Sync + fmt::Debug {
    /// Evaluates the chain for the actor.
    fn can_access(&self, actor: &Actor, chain: &ResourceChain, op: Operation) -> Decision;
}

/// The actor's tenant equals the resource's tenant and every property
/// reachable from the resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameTenant;

impl AccessCheck for SameTenant {
    fn check(&self, actor: &Actor, chain: &ResourceChain, _op: Operation) -> Result<(), DenyReason> {
        let Some(tenant_id) = actor.tenant_id else {
            return Err(DenyReason::MissingTenant);
        };
        if tenant_id != chain.tenant_id || !chain.is_tenant_consistent() {
            return Err(DenyReason::CrossTenant);
        }
        Ok(())
    }
}

/// The actor owns every property reachable from the resource.
///
/// A chain without any reachable property fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyOwnership;

impl AccessCheck for PropertyOwnership {
    fn check(&self, actor: &Actor, chain: &ResourceChain, _op: Operation) -> Result<(), DenyReason> {
        if chain.properties.is_empty() {
            return Err(DenyReason::NoReachableProperty);
        }
        if chain
            .properties
            .iter()
            .all(|p| p.owner_id == Some(actor.id))
        {
            Ok(())
        } else {
            Err(DenyReason::NotOwner)
        }
    }
}

/// Only reads are permitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

impl AccessCheck for ReadOnly {
    fn check(&self, _actor: &Actor, _chain: &ResourceChain, op: Operation) -> Result<(), DenyReason> {
        if op.is_write() {
            Err(DenyReason::ReadOnlyRole)
        } else {
            Ok(())
        }
    }
}

/// A policy that allows access when every check passes.
///
/// An empty policy allows everything.
#[derive(Debug, Default)]
pub struct CheckedPolicy {
    checks: Vec<Box<dyn AccessCheck>>,
}

impl CheckedPolicy {
    /// Creates a policy without checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a check evaluated after the existing ones.
    #[must_use]
    pub fn then(mut self, check: impl AccessCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Number of checks in the policy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if the policy has no checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl AccessPolicy for CheckedPolicy {
    fn can_access(&self, actor: &Actor, chain: &ResourceChain, op: Operation) -> Decision {
        let tenant_id = chain.tenant_id;
        match self
            .checks
            .iter()
            .try_for_each(|check| check.check(actor, chain, op))
        {
            Ok(()) => Decision::Allow { tenant_id },
            Err(reason) => Decision::Deny { tenant_id, reason },
        }
    }
}
