//! Authorization error types.

use thiserror::Error;
use uuid::Uuid;

use staydesk_shared::{AppError, Role};

use super::types::{DenyReason, ResourceKind};

/// Errors raised when an actor may not perform an operation.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The resource does not exist for this actor.
    ///
    /// Cross-tenant denials are reported this way.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the resource.
        kind: ResourceKind,
        /// Id of the resource.
        id: Uuid,
    },

    /// The actor can see the resource but may not perform the operation.
    #[error("Access to {kind} {id} denied: {reason}")]
    Forbidden {
        /// Kind of the resource.
        kind: ResourceKind,
        /// Id of the resource.
        id: Uuid,
        /// Why access was refused.
        reason: DenyReason,
    },

    /// The operation is reserved to a specific role.
    #[error("Operation requires role {required}, actor has {actual}")]
    RoleRequired {
        /// Role required by the operation.
        required: Role,
        /// Role of the actor.
        actual: Role,
    },

    /// The actor's role may only read.
    #[error("Role {0} is read-only")]
    ReadOnlyRole(Role),

    /// The actor is not bound to a tenant.
    #[error("Actor is not bound to a tenant")]
    MissingTenant,
}

impl AccessError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Forbidden { .. }
            | Self::RoleRequired { .. }
            | Self::ReadOnlyRole(_)
            | Self::MissingTenant => 403,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::RoleRequired { .. } => "ROLE_REQUIRED",
            Self::ReadOnlyRole(_) => "READ_ONLY_ROLE",
            Self::MissingTenant => "MISSING_TENANT",
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        Self::from_status(err.status_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let id = Uuid::nil();
        let err = AccessError::NotFound {
            kind: ResourceKind::Booking,
            id,
        };
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("booking"));
        assert!(matches!(AppError::from(err), AppError::NotFound(_)));
    }

    #[test]
    fn test_forbidden_error() {
        let err = AccessError::Forbidden {
            kind: ResourceKind::Invoice,
            id: Uuid::nil(),
            reason: DenyReason::NotOwner,
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(matches!(AppError::from(err), AppError::Forbidden(_)));
    }

    #[test]
    fn test_role_required_error() {
        let err = AccessError::RoleRequired {
            required: Role::SuperAdmin,
            actual: Role::Admin,
        };
        assert_eq!(err.status_code(), 403);
        assert!(err.to_string().contains("SUPER_ADMIN"));
    }

    #[test]
    fn test_read_only_error() {
        let err = AccessError::ReadOnlyRole(Role::Staff);
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "READ_ONLY_ROLE");
    }
}
