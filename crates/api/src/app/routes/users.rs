//! User routes: login, registration, listing, update, soft-delete.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use taller_auth::{hash_password, rules, AuthClaims, Role};
use taller_core::{DomainError, UserId};
use taller_workshop::{NewUser, User, UserUpdate};

use crate::app::errors::{json_error, ApiError};
use crate::app::{dto, services::AppServices};
use crate::context::{PrincipalContext, ScopeContext};

/// POST /users/login — public.
///
/// Unknown email, inactive account and wrong password are indistinguishable:
/// one uniform invalid-credentials answer.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Result<axum::response::Response, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(DomainError::invalid_input("email and password are required").into());
    }

    let email = taller_workshop::validate::normalize_email(&body.email);
    let user = services.users.find_by_email(&email).await?;

    let user = match user {
        Some(u) if u.active && taller_auth::verify_password(&body.password, &u.password_hash) => u,
        _ => {
            return Ok(json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "invalid credentials",
            ))
        }
    };

    let claims = AuthClaims::new(user.id, user.role, user.company_id);
    let token = services
        .tokens
        .issue(&claims)
        .map_err(|e| DomainError::internal(e.to_string()))?;

    Ok(Json(serde_json::json!({ "token": token })).into_response())
}

/// POST /users/register — role ∈ {ADMIN, SUPER_ADMIN}.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::RegisterUserRequest>,
) -> Result<axum::response::Response, ApiError> {
    let actor = principal.role();

    if !rules::may_assign(actor, body.role) {
        return Err(DomainError::forbidden(format!(
            "cannot assign role {}",
            body.role
        ))
        .into());
    }

    // The creator's own tenant wins for tenant-bound actors; only the
    // top-level role may name one (and so create users under any tenant).
    let company_id = if actor.is_top_level() {
        body.company_id
    } else {
        principal.company_id()
    };

    if body.password.trim().is_empty() {
        return Err(DomainError::invalid_input("password is required").into());
    }
    let password_hash =
        hash_password(&body.password).map_err(|e| DomainError::internal(e.to_string()))?;

    let user = NewUser {
        name: body.name,
        email: body.email,
        password_hash,
        role: body.role,
        company_id,
    }
    .validated()?;

    let created = services.users.insert(User::create(user)).await?;
    tracing::info!(user_id = %created.id, role = %created.role, "user registered");

    Ok((StatusCode::CREATED, Json(dto::user_to_json(&created))).into_response())
}

/// GET /users — tenant-scoped listing; the top-level role may widen to all
/// tenants or narrow to one with `?companyId=`.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Query(query): Query<dto::ListQuery>,
) -> Result<axum::response::Response, ApiError> {
    let listing_scope = scope.listing_scope(query.company_id);
    let page = services
        .users
        .list(&listing_scope, &query.filter(), query.page_params())
        .await?;

    let page = page.map(|u| dto::user_to_json(&u));
    Ok(Json(dto::page_to_json(page)).into_response())
}

/// GET /users/:id.
pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: UserId = id.parse()?;
    let user = services.users.get(&scope.scope(), id).await?;
    Ok(Json(dto::user_to_json(&user)).into_response())
}

/// PUT /users/:id — role and tenant changes are rule-gated.
pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(scope): Extension<ScopeContext>,
    Path(id): Path<String>,
    Json(body): Json<UserUpdate>,
) -> Result<axum::response::Response, ApiError> {
    let id: UserId = id.parse()?;
    let actor = principal.role();

    if let Some(role) = body.role {
        if !rules::may_assign(actor, role) {
            return Err(DomainError::forbidden(format!("cannot assign role {role}")).into());
        }
    }
    if body.company_id.is_some() && !rules::may_change_tenant(actor) {
        return Err(DomainError::forbidden("cannot change a user's company").into());
    }

    // Scoped fetch first: an id in another tenant is a plain 404.
    let mut user = services.users.get(&scope.scope(), id).await?;
    user.apply(body)?;
    let updated = services.users.update(user).await?;

    Ok(Json(dto::user_to_json(&updated)).into_response())
}

/// DELETE /users/:id — soft-delete (flips `active`, keeps the record).
pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(scope): Extension<ScopeContext>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: UserId = id.parse()?;

    let mut user = services.users.get(&scope.scope(), id).await?;

    if !rules::may_soft_delete(principal.role(), user.role) {
        let msg = match user.role {
            Role::Admin => "admin cannot delete another admin",
            _ => "cannot delete this user",
        };
        return Err(DomainError::forbidden(msg).into());
    }

    // Idempotent: a second delete re-persists active = false.
    user.deactivate();
    let user = services.users.update(user).await?;
    tracing::info!(user_id = %user.id, "user deactivated");

    Ok(Json(serde_json::json!({
        "message": "user deactivated",
        "user": dto::user_to_json(&user),
    }))
    .into_response())
}

#[cfg(test)]
mod tests {
    use crate::context::ScopeContext;
    use taller_core::{TenantId, TenantScope};

    #[test]
    fn admin_listing_is_pinned_to_own_tenant() {
        let own = TenantId::new();
        let foreign = TenantId::new();
        let ctx = ScopeContext::new(TenantScope::Tenant(own));
        assert_eq!(ctx.listing_scope(Some(foreign)), TenantScope::Tenant(own));
    }
}
