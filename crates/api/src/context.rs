//! Request-scoped context values.
//!
//! Both contexts are assembled once by the resolver chain in
//! [`crate::middleware`] and inserted into request extensions as immutable
//! values; handlers only ever read them. Nothing here survives the response.

use taller_auth::{AuthClaims, Role};
use taller_core::{DomainResult, TenantId, TenantScope, UserId};

/// Authenticated principal for a request (the verified token's claims).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    claims: AuthClaims,
}

impl PrincipalContext {
    pub fn new(claims: AuthClaims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &AuthClaims {
        &self.claims
    }

    pub fn user_id(&self) -> UserId {
        self.claims.sub
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn company_id(&self) -> Option<TenantId> {
        self.claims.company_id
    }
}

/// Effective tenant scope for a request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScopeContext {
    scope: TenantScope,
}

impl ScopeContext {
    pub fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> TenantScope {
        self.scope
    }

    /// Resolve the single tenant a scoped operation runs under.
    ///
    /// Tenant-bound callers always get their own tenant — an explicit
    /// identifier in the query string is ignored, never honored. A global
    /// caller must have supplied one; otherwise the operation has no tenant
    /// to run under and fails `MissingTenant`.
    pub fn effective_tenant(&self, explicit: Option<TenantId>) -> DomainResult<TenantId> {
        match self.scope {
            TenantScope::Tenant(id) => Ok(id),
            TenantScope::Global => explicit.ok_or(taller_core::DomainError::MissingTenant),
        }
    }

    /// Scope for user listings: a global caller may narrow to one tenant with
    /// an explicit identifier (or see every tenant without one); everyone
    /// else stays pinned to their own tenant.
    pub fn listing_scope(&self, explicit: Option<TenantId>) -> TenantScope {
        match self.scope {
            TenantScope::Tenant(id) => TenantScope::Tenant(id),
            TenantScope::Global => match explicit {
                Some(id) => TenantScope::Tenant(id),
                None => TenantScope::Global,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taller_core::DomainError;

    #[test]
    fn tenant_bound_scope_ignores_explicit_tenant() {
        let own = TenantId::new();
        let other = TenantId::new();
        let ctx = ScopeContext::new(TenantScope::Tenant(own));
        assert_eq!(ctx.effective_tenant(Some(other)).unwrap(), own);
        assert_eq!(ctx.listing_scope(Some(other)), TenantScope::Tenant(own));
    }

    #[test]
    fn global_scope_requires_explicit_tenant_for_scoped_ops() {
        let ctx = ScopeContext::new(TenantScope::Global);
        assert_eq!(ctx.effective_tenant(None).unwrap_err(), DomainError::MissingTenant);
        let id = TenantId::new();
        assert_eq!(ctx.effective_tenant(Some(id)).unwrap(), id);
    }

    #[test]
    fn global_listing_scope_widens_when_unfiltered() {
        let ctx = ScopeContext::new(TenantScope::Global);
        assert_eq!(ctx.listing_scope(None), TenantScope::Global);
    }
}
