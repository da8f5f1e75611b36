//! Role gate.
//!
//! Every mutation (and the gated reads) runs through [`RoleGate::check`]
//! before any other logic. Allow-lists live in [`acl`] as static tables,
//! one per operation group, instead of literal arrays at call sites.

use commandpost_core::Role;

use crate::error::ServiceError;

/// Decides whether a caller may perform an operation.
pub trait RoleGate: Send + Sync {
    /// Permits the caller or fails with `Unauthorized`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Unauthorized` when no role was supplied or
    /// the supplied role is not in the allow-list.
    fn check(&self, caller: Option<Role>, allowed: &[Role]) -> Result<(), ServiceError>;
}

/// Allow-list lookup against the caller-supplied role.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGate;

impl RoleGate for StaticGate {
    fn check(&self, caller: Option<Role>, allowed: &[Role]) -> Result<(), ServiceError> {
        let Some(role) = caller else {
            return Err(ServiceError::unauthorized("no access level supplied"));
        };
        if allowed.contains(&role) {
            Ok(())
        } else {
            Err(ServiceError::unauthorized(format!(
                "access level {role} may not perform this operation"
            )))
        }
    }
}

/// Static allow-lists per operation group.
pub mod acl {
    use commandpost_core::Role::{self, Admin, Commander, Supervisor};

    pub const AMBULANCE_READ: &[Role] = &[Commander];
    pub const AMBULANCE_MANAGE: &[Role] = &[Commander];
    pub const AMBULANCE_DELETE: &[Role] = &[Admin, Commander];

    pub const HOSPITAL_MANAGE: &[Role] = &[Commander];
    pub const HOSPITAL_DELETE: &[Role] = &[Admin, Commander];

    pub const EVENT_MANAGE: &[Role] = &[Admin, Commander];

    pub const COLLECTION_POINT_MANAGE: &[Role] = &[Admin, Commander, Supervisor];

    pub const PATIENT_MANAGE: &[Role] = &[Admin, Commander, Supervisor];

    pub const USER_MANAGE: &[Role] = &[Admin];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_role_passes() {
        let gate = StaticGate;
        assert!(gate.check(Some(Role::Commander), acl::AMBULANCE_READ).is_ok());
    }

    #[test]
    fn test_missing_role_is_rejected() {
        let gate = StaticGate;
        let err = gate.check(None, acl::AMBULANCE_READ).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_role_outside_allow_list_is_rejected() {
        let gate = StaticGate;
        let err = gate
            .check(Some(Role::Supervisor), acl::AMBULANCE_DELETE)
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("SUPERVISOR"));
    }
}
