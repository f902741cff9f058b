//! Identity and tenant-scope resolution.
//!
//! Every protected request passes through [`auth_middleware`]: bearer
//! extraction, token verification, then tenant-scope resolution. The chain
//! never touches storage — the verified claims are the identity snapshot for
//! the request's lifetime.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use taller_auth::TokenService;
use taller_core::{DomainError, TenantScope};

use crate::app::errors::ApiError;
use crate::context::{PrincipalContext, ScopeContext};

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenService>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| DomainError::Unauthenticated)?;

    // Tenant scope: the top-level role operates globally and names a tenant
    // explicitly where needed; everyone else is pinned to their own tenant.
    // A tenant-bound token without a tenant should be unreachable given the
    // user invariants, but it is checked, not assumed.
    let scope = if claims.role.is_top_level() {
        TenantScope::Global
    } else {
        match claims.company_id {
            Some(id) => TenantScope::Tenant(id),
            None => return Err(DomainError::MissingTenant.into()),
        }
    };

    req.extensions_mut().insert(PrincipalContext::new(claims));
    req.extensions_mut().insert(ScopeContext::new(scope));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(DomainError::Unauthenticated)?;

    let header = header.to_str().map_err(|_| DomainError::Unauthenticated)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(DomainError::Unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(DomainError::Unauthenticated.into());
    }

    Ok(token)
}
