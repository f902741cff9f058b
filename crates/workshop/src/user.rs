//! User (principal) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taller_auth::Role;
use taller_core::{DomainError, DomainResult, TenantId, UserId};

use crate::validate;

/// An authenticated actor.
///
/// # Invariants
/// - Every user except a `SuperAdmin` owns exactly one company reference;
///   creating or updating a tenant-bound user without one is a validation
///   failure.
/// - `email` is unique across ALL tenants (unlike client/mechanic fields,
///   which are unique per tenant).
/// - "Deleting" a user flips `active` to false; rows are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Credential hash. Skipped on serialization so it can never reach a
    /// response payload; the API layer additionally maps users through DTOs.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<TenantId>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a user. `password_hash` is already hashed —
/// plaintext never crosses this boundary.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub company_id: Option<TenantId>,
}

impl NewUser {
    pub fn validated(self) -> DomainResult<Self> {
        let name = validate::require_non_empty("name", &self.name)?;
        let email = validate::require_email(&self.email)?;
        check_tenant_invariant(self.role, self.company_id)?;
        Ok(Self {
            name,
            email,
            password_hash: self.password_hash,
            role: self.role,
            company_id: self.company_id,
        })
    }
}

/// Partial update for a user. `id` never appears here; `company_id` is only
/// honored for callers the rule table allows to move users between tenants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(rename = "companyId")]
    pub company_id: Option<TenantId>,
    pub active: Option<bool>,
}

impl User {
    pub fn create(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            company_id: input.company_id,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, re-checking the tenant invariant afterwards.
    pub fn apply(&mut self, update: UserUpdate) -> DomainResult<()> {
        if let Some(name) = update.name {
            self.name = validate::require_non_empty("name", &name)?;
        }
        if let Some(email) = update.email {
            self.email = validate::require_email(&email)?;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(company_id) = update.company_id {
            self.company_id = Some(company_id);
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        check_tenant_invariant(self.role, self.company_id)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }
}

fn check_tenant_invariant(role: Role, company_id: Option<TenantId>) -> DomainResult<()> {
    if !role.is_top_level() && company_id.is_none() {
        return Err(DomainError::invalid_input(
            "a company is required for this role",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(role: Role, company_id: Option<TenantId>) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            email: "ana@taller.es".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            role,
            company_id,
        }
    }

    #[test]
    fn tenant_bound_user_requires_company() {
        assert!(new_user(Role::Admin, None).validated().is_err());
        assert!(new_user(Role::Mechanic, None).validated().is_err());
        assert!(new_user(Role::Admin, Some(TenantId::new())).validated().is_ok());
    }

    #[test]
    fn super_admin_needs_no_company() {
        assert!(new_user(Role::SuperAdmin, None).validated().is_ok());
    }

    #[test]
    fn update_cannot_strand_a_tenant_bound_user() {
        let mut user = User::create(new_user(Role::SuperAdmin, None).validated().unwrap());
        let update = UserUpdate {
            role: Some(Role::Mechanic),
            ..Default::default()
        };
        // Demoting a company-less user to a tenant-bound role must fail.
        assert!(user.apply(update).is_err());
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut user =
            User::create(new_user(Role::Mechanic, Some(TenantId::new())).validated().unwrap());
        user.deactivate();
        assert!(!user.active);
        user.deactivate();
        assert!(!user.active);
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = User::create(new_user(Role::Admin, Some(TenantId::new())).validated().unwrap());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
