//! Super-admin bootstrap.

use taller_auth::{hash_password, Role};
use taller_core::{DomainError, DomainResult};
use taller_workshop::{validate, NewUser, User};

use crate::store::UserStore;

/// Ensure a top-level administrator exists for the given credentials.
///
/// Idempotent: if a user with that email already exists (whatever its role),
/// nothing is written. Returns the created user, or `None` when the seed was
/// a no-op.
pub async fn ensure_super_admin(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> DomainResult<Option<User>> {
    let email = validate::require_email(email)?;

    if users.find_by_email(&email).await?.is_some() {
        tracing::info!("super admin already exists, skipping seed");
        return Ok(None);
    }

    let password_hash =
        hash_password(password).map_err(|e| DomainError::internal(e.to_string()))?;

    let seed = NewUser {
        name: "Super Admin".to_string(),
        email,
        password_hash,
        role: Role::SuperAdmin,
        company_id: None,
    }
    .validated()?;

    let created = users.insert(User::create(seed)).await?;
    tracing::info!(user_id = %created.id, "super admin created");
    Ok(Some(created))
}
