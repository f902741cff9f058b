//! Tenant-scoped storage traits.
//!
//! Every read and write is parameterized by the owning tenant (or the
//! request's [`TenantScope`] where the top-level role may see across
//! tenants). Backends never get the chance to forget the boundary: it is in
//! the method signature.
//!
//! Cross-tenant opacity: an id that exists under a different tenant is
//! reported as `NotFound`, exactly like a nonexistent id.

use async_trait::async_trait;

use taller_core::{
    unaccent, ClientId, DomainResult, MechanicId, Page, PageParams, TenantId, TenantScope, UserId,
};
use taller_workshop::{Client, Company, Mechanic, User};

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Optional substring filter for listings.
///
/// The term is normalized through unaccent once, then matched
/// case-insensitively across the entity's searchable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    term: Option<String>,
}

impl SearchFilter {
    pub fn new(term: Option<String>) -> Self {
        let term = term
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { term }
    }

    /// Lowercased, unaccented needle; `None` when no filtering is requested.
    pub fn needle(&self) -> Option<String> {
        self.term.as_deref().map(|t| unaccent(t).to_lowercase())
    }
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Insert a company. Fails `Conflict` if the document already exists.
    async fn insert(&self, company: Company) -> DomainResult<Company>;

    async fn get(&self, id: TenantId) -> DomainResult<Company>;

    async fn find_by_document(&self, document: &str) -> DomainResult<Option<Company>>;

    /// Remove a company record. Only used as the compensating action of the
    /// provisioning workflow; companies are otherwise never removed.
    async fn remove(&self, id: TenantId) -> DomainResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails `Conflict` if the email exists under ANY tenant
    /// (user emails are globally unique).
    async fn insert(&self, user: User) -> DomainResult<User>;

    /// Persist an updated user (matched by id). Fails `NotFound` if the row
    /// is gone, `Conflict` on an email collision.
    async fn update(&self, user: User) -> DomainResult<User>;

    /// Fetch a user visible under the given scope.
    async fn get(&self, scope: &TenantScope, id: UserId) -> DomainResult<User>;

    /// Lookup by normalized email across all tenants (login path, uniqueness
    /// checks). Includes inactive users; callers filter.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// List users under the scope (global scope lists every tenant), with
    /// optional name/email search and Spanish-collation name ordering.
    async fn list(
        &self,
        scope: &TenantScope,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<User>>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a client. Fails `Conflict` when the document number or email is
    /// already taken within the same company (scoped, not global).
    async fn insert(&self, client: Client) -> DomainResult<Client>;

    async fn update(&self, client: Client) -> DomainResult<Client>;

    async fn get(&self, company_id: TenantId, id: ClientId) -> DomainResult<Client>;

    /// Remove a client within the company; returns the removed record.
    async fn remove(&self, company_id: TenantId, id: ClientId) -> DomainResult<Client>;

    async fn list(
        &self,
        company_id: TenantId,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<Client>>;
}

#[async_trait]
pub trait MechanicStore: Send + Sync {
    async fn insert(&self, mechanic: Mechanic) -> DomainResult<Mechanic>;

    async fn update(&self, mechanic: Mechanic) -> DomainResult<Mechanic>;

    async fn get(&self, company_id: TenantId, id: MechanicId) -> DomainResult<Mechanic>;

    async fn remove(&self, company_id: TenantId, id: MechanicId) -> DomainResult<Mechanic>;

    async fn list(
        &self,
        company_id: TenantId,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<Mechanic>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_normalizes_term() {
        let f = SearchFilter::new(Some("  Peña ".to_string()));
        assert_eq!(f.needle().as_deref(), Some("pena"));
        assert_eq!(SearchFilter::new(Some("   ".to_string())), SearchFilter::default());
        assert_eq!(SearchFilter::default().needle(), None);
    }
}
