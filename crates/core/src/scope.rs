//! Effective tenant scope of a request.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::TenantId;

/// The tenant boundary applied to every repository operation.
///
/// `Global` exists only for the top-level role; everything else always acts
/// within exactly one tenant. Operations that need a concrete tenant call
/// [`TenantScope::require_tenant`], so a global caller that failed to supply
/// one is rejected instead of silently widening the query.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantScope {
    Global,
    Tenant(TenantId),
}

impl TenantScope {
    pub fn tenant(&self) -> Option<TenantId> {
        match self {
            TenantScope::Global => None,
            TenantScope::Tenant(id) => Some(*id),
        }
    }

    pub fn require_tenant(&self) -> DomainResult<TenantId> {
        self.tenant().ok_or(DomainError::MissingTenant)
    }

    /// Whether an entity owned by `company` is visible under this scope.
    /// Company-less records (top-level accounts) are only visible globally.
    pub fn covers(&self, company: Option<TenantId>) -> bool {
        match self {
            TenantScope::Global => true,
            TenantScope::Tenant(id) => company == Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_tenant_on_global_is_missing_tenant() {
        assert_eq!(
            TenantScope::Global.require_tenant().unwrap_err(),
            DomainError::MissingTenant
        );
        let id = TenantId::new();
        assert_eq!(TenantScope::Tenant(id).require_tenant().unwrap(), id);
    }

    #[test]
    fn coverage_rules() {
        let a = TenantId::new();
        let b = TenantId::new();
        assert!(TenantScope::Global.covers(Some(a)));
        assert!(TenantScope::Global.covers(None));
        assert!(TenantScope::Tenant(a).covers(Some(a)));
        assert!(!TenantScope::Tenant(a).covers(Some(b)));
        assert!(!TenantScope::Tenant(a).covers(None));
    }
}
