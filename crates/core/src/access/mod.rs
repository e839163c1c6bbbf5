//! Tenant-scoped authorization.
//!
//! Every request re-derives access by walking the resource's ownership
//! chain (Booking → Property → Owner, Payment → Booking → Property,
//! Invoice → members → Properties).
//!
//! # Modules
//!
//! - `types` - Resource chains, operations and decisions
//! - `policy` - Ordered access checks composed into per-role policies
//! - `evaluator` - The role → policy table
//! - `error` - Authorization errors

pub mod error;
pub mod evaluator;
pub mod policy;
pub mod types;

#[cfg(test)]
mod evaluator_props;

pub use error::AccessError;
pub use evaluator::AccessEvaluator;
pub use policy::{AccessCheck, AccessPolicy, CheckedPolicy, PropertyOwnership, ReadOnly, SameTenant};
pub use types::{
    Decision, DenyReason, ListScope, Operation, PropertyRef, ResourceChain, ResourceKind,
    TenantScope,
};
