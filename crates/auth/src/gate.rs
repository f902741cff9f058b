//! Role authorization gate.

use thiserror::Error;

use crate::{AuthClaims, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,
}

/// A reusable guard built from a fixed allow-list of roles.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// Routers compose the same gate with different allow-lists: tenant
/// administration gates on `{Admin, SuperAdmin}`, tenant provisioning on
/// `{SuperAdmin}` only.
#[derive(Debug, Copy, Clone)]
pub struct RoleGate {
    allow: &'static [Role],
}

impl RoleGate {
    pub const fn allow(allow: &'static [Role]) -> Self {
        Self { allow }
    }

    pub fn check(&self, claims: Option<&AuthClaims>) -> Result<(), AuthzError> {
        let claims = claims.ok_or(AuthzError::Unauthenticated)?;
        if self.allow.contains(&claims.role) {
            Ok(())
        } else {
            Err(AuthzError::Forbidden)
        }
    }
}

/// Gate for tenant-scoped administration (users, clients, mechanics).
pub const ADMIN_GATE: RoleGate = RoleGate::allow(&[Role::Admin, Role::SuperAdmin]);

/// Gate for tenant provisioning.
pub const SUPER_ADMIN_GATE: RoleGate = RoleGate::allow(&[Role::SuperAdmin]);

#[cfg(test)]
mod tests {
    use super::*;
    use taller_core::{TenantId, UserId};

    fn claims(role: Role) -> AuthClaims {
        let company = (!role.is_top_level()).then(TenantId::new);
        AuthClaims::new(UserId::new(), role, company)
    }

    #[test]
    fn missing_principal_is_unauthenticated() {
        assert_eq!(ADMIN_GATE.check(None), Err(AuthzError::Unauthenticated));
    }

    #[test]
    fn role_outside_allow_list_is_forbidden() {
        assert_eq!(
            ADMIN_GATE.check(Some(&claims(Role::Mechanic))),
            Err(AuthzError::Forbidden)
        );
        assert_eq!(
            SUPER_ADMIN_GATE.check(Some(&claims(Role::Admin))),
            Err(AuthzError::Forbidden)
        );
    }

    #[test]
    fn allowed_roles_pass() {
        assert_eq!(ADMIN_GATE.check(Some(&claims(Role::Admin))), Ok(()));
        assert_eq!(ADMIN_GATE.check(Some(&claims(Role::SuperAdmin))), Ok(()));
        assert_eq!(SUPER_ADMIN_GATE.check(Some(&claims(Role::SuperAdmin))), Ok(()));
    }
}
