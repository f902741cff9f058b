//! Rule tables for managed-user operations.
//!
//! These replace scattered per-handler role comparisons with declarative
//! tables the API layer consults before touching storage.

use crate::Role;

/// Roles an actor may assign when creating or updating a user.
///
/// Only the top-level role may assign anything; an admin manages workshop
/// staff, never other admins or top-level accounts.
pub fn assignable_roles(actor: Role) -> &'static [Role] {
    match actor {
        Role::SuperAdmin => &[
            Role::SuperAdmin,
            Role::Admin,
            Role::Mechanic,
            Role::Administrative,
        ],
        Role::Admin => &[Role::Mechanic, Role::Administrative],
        Role::Mechanic | Role::Administrative => &[],
    }
}

pub fn may_assign(actor: Role, target: Role) -> bool {
    assignable_roles(actor).contains(&target)
}

/// Only the top-level role may move a user between tenants.
pub fn may_change_tenant(actor: Role) -> bool {
    actor.is_top_level()
}

/// Soft-delete rule: an admin may deactivate anyone in their tenant except
/// another admin (or a top-level account).
pub fn may_soft_delete(actor: Role, target: Role) -> bool {
    match actor {
        Role::SuperAdmin => true,
        Role::Admin => !matches!(target, Role::Admin | Role::SuperAdmin),
        Role::Mechanic | Role::Administrative => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_assigns_any_role() {
        for role in [
            Role::SuperAdmin,
            Role::Admin,
            Role::Mechanic,
            Role::Administrative,
        ] {
            assert!(may_assign(Role::SuperAdmin, role));
        }
    }

    #[test]
    fn admin_assigns_only_staff_roles() {
        assert!(may_assign(Role::Admin, Role::Mechanic));
        assert!(may_assign(Role::Admin, Role::Administrative));
        assert!(!may_assign(Role::Admin, Role::Admin));
        assert!(!may_assign(Role::Admin, Role::SuperAdmin));
    }

    #[test]
    fn staff_roles_assign_nothing() {
        assert!(assignable_roles(Role::Mechanic).is_empty());
        assert!(assignable_roles(Role::Administrative).is_empty());
    }

    #[test]
    fn only_super_admin_moves_tenants() {
        assert!(may_change_tenant(Role::SuperAdmin));
        assert!(!may_change_tenant(Role::Admin));
    }

    #[test]
    fn admin_cannot_delete_admin() {
        assert!(!may_soft_delete(Role::Admin, Role::Admin));
        assert!(!may_soft_delete(Role::Admin, Role::SuperAdmin));
        assert!(may_soft_delete(Role::Admin, Role::Mechanic));
        assert!(may_soft_delete(Role::Admin, Role::Administrative));
        assert!(may_soft_delete(Role::SuperAdmin, Role::Admin));
    }
}
