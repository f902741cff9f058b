//! In-memory backend for dev/test.
//!
//! Mirrors the persistent backend's contract exactly — scoped uniqueness,
//! cross-tenant opacity, search and ordering — so black-box tests exercise
//! the same behavior the Postgres backend delegates to its indexes.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use taller_core::{
    collation_key, ClientId, DomainError, DomainResult, MechanicId, Page, PageParams, TenantId,
    TenantScope, UserId,
};
use taller_workshop::{Client, Company, Mechanic, User};

use super::{ClientStore, CompanyStore, MechanicStore, SearchFilter, UserStore};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    companies: RwLock<HashMap<TenantId, Company>>,
    users: RwLock<HashMap<UserId, User>>,
    clients: RwLock<HashMap<ClientId, Client>>,
    mechanics: RwLock<HashMap<MechanicId, Mechanic>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> DomainError {
    DomainError::internal("store lock poisoned")
}

/// Case-insensitive substring match of an already-normalized needle.
fn field_matches(value: &str, needle: &str) -> bool {
    value.to_lowercase().contains(needle)
}

/// Sort by Spanish base-letter collation, slice out the requested window.
fn paginate<T>(mut items: Vec<T>, key: impl Fn(&T) -> String, page: PageParams) -> Page<T> {
    items.sort_by_cached_key(|item| collation_key(&key(item)));
    let total = items.len() as u64;
    let window = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(window, total, page)
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    async fn insert(&self, company: Company) -> DomainResult<Company> {
        let mut companies = self.companies.write().map_err(|_| lock_poisoned())?;
        if companies
            .values()
            .any(|c| c.document.eq_ignore_ascii_case(&company.document))
        {
            return Err(DomainError::conflict("company document already exists"));
        }
        companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn get(&self, id: TenantId) -> DomainResult<Company> {
        let companies = self.companies.read().map_err(|_| lock_poisoned())?;
        companies.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    async fn find_by_document(&self, document: &str) -> DomainResult<Option<Company>> {
        let companies = self.companies.read().map_err(|_| lock_poisoned())?;
        Ok(companies
            .values()
            .find(|c| c.document.eq_ignore_ascii_case(document))
            .cloned())
    }

    async fn remove(&self, id: TenantId) -> DomainResult<()> {
        let mut companies = self.companies.write().map_err(|_| lock_poisoned())?;
        companies.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: User) -> DomainResult<User> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::conflict("user email already exists"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let mut users = self.users.write().map_err(|_| lock_poisoned())?;
        if !users.contains_key(&user.id) {
            return Err(DomainError::NotFound);
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::conflict("user email already exists"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, scope: &TenantScope, id: UserId) -> DomainResult<User> {
        let users = self.users.read().map_err(|_| lock_poisoned())?;
        users
            .get(&id)
            .filter(|u| scope.covers(u.company_id))
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let users = self.users.read().map_err(|_| lock_poisoned())?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(
        &self,
        scope: &TenantScope,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<User>> {
        let users = self.users.read().map_err(|_| lock_poisoned())?;
        let needle = filter.needle();
        let matched: Vec<User> = users
            .values()
            .filter(|u| scope.covers(u.company_id))
            .filter(|u| match needle.as_deref() {
                Some(n) => field_matches(&u.name, n) || field_matches(&u.email, n),
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(matched, |u| u.name.clone(), page))
    }
}

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn insert(&self, client: Client) -> DomainResult<Client> {
        let mut clients = self.clients.write().map_err(|_| lock_poisoned())?;
        let duplicate = clients.values().any(|c| {
            c.company_id == client.company_id
                && (c.document_number == client.document_number
                    || (c.email.is_some() && c.email == client.email))
        });
        if duplicate {
            return Err(DomainError::conflict(
                "client document number or email already exists",
            ));
        }
        clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn update(&self, client: Client) -> DomainResult<Client> {
        let mut clients = self.clients.write().map_err(|_| lock_poisoned())?;
        match clients.get(&client.id) {
            Some(existing) if existing.company_id == client.company_id => {}
            _ => return Err(DomainError::NotFound),
        }
        let duplicate = clients.values().any(|c| {
            c.id != client.id
                && c.company_id == client.company_id
                && (c.document_number == client.document_number
                    || (c.email.is_some() && c.email == client.email))
        });
        if duplicate {
            return Err(DomainError::conflict(
                "client document number or email already exists",
            ));
        }
        clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn get(&self, company_id: TenantId, id: ClientId) -> DomainResult<Client> {
        let clients = self.clients.read().map_err(|_| lock_poisoned())?;
        clients
            .get(&id)
            .filter(|c| c.company_id == company_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    async fn remove(&self, company_id: TenantId, id: ClientId) -> DomainResult<Client> {
        let mut clients = self.clients.write().map_err(|_| lock_poisoned())?;
        match clients.get(&id) {
            Some(c) if c.company_id == company_id => {}
            _ => return Err(DomainError::NotFound),
        }
        clients.remove(&id).ok_or(DomainError::NotFound)
    }

    async fn list(
        &self,
        company_id: TenantId,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<Client>> {
        let clients = self.clients.read().map_err(|_| lock_poisoned())?;
        let needle = filter.needle();
        let matched: Vec<Client> = clients
            .values()
            .filter(|c| c.company_id == company_id)
            .filter(|c| match needle.as_deref() {
                Some(n) => {
                    field_matches(&c.name, n)
                        || field_matches(&c.document_number, n)
                        || field_matches(&c.telephone, n)
                        || c.email.as_deref().is_some_and(|e| field_matches(e, n))
                }
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(matched, |c| c.name.clone(), page))
    }
}

#[async_trait]
impl MechanicStore for InMemoryStore {
    async fn insert(&self, mechanic: Mechanic) -> DomainResult<Mechanic> {
        let mut mechanics = self.mechanics.write().map_err(|_| lock_poisoned())?;
        mechanics.insert(mechanic.id, mechanic.clone());
        Ok(mechanic)
    }

    async fn update(&self, mechanic: Mechanic) -> DomainResult<Mechanic> {
        let mut mechanics = self.mechanics.write().map_err(|_| lock_poisoned())?;
        match mechanics.get(&mechanic.id) {
            Some(existing) if existing.company_id == mechanic.company_id => {}
            _ => return Err(DomainError::NotFound),
        }
        mechanics.insert(mechanic.id, mechanic.clone());
        Ok(mechanic)
    }

    async fn get(&self, company_id: TenantId, id: MechanicId) -> DomainResult<Mechanic> {
        let mechanics = self.mechanics.read().map_err(|_| lock_poisoned())?;
        mechanics
            .get(&id)
            .filter(|m| m.company_id == company_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    async fn remove(&self, company_id: TenantId, id: MechanicId) -> DomainResult<Mechanic> {
        let mut mechanics = self.mechanics.write().map_err(|_| lock_poisoned())?;
        match mechanics.get(&id) {
            Some(m) if m.company_id == company_id => {}
            _ => return Err(DomainError::NotFound),
        }
        mechanics.remove(&id).ok_or(DomainError::NotFound)
    }

    async fn list(
        &self,
        company_id: TenantId,
        filter: &SearchFilter,
        page: PageParams,
    ) -> DomainResult<Page<Mechanic>> {
        let mechanics = self.mechanics.read().map_err(|_| lock_poisoned())?;
        let needle = filter.needle();
        let matched: Vec<Mechanic> = mechanics
            .values()
            .filter(|m| m.company_id == company_id)
            .filter(|m| match needle.as_deref() {
                Some(n) => field_matches(&m.name, n) || field_matches(&m.telephone, n),
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(matched, |m| m.name.clone(), page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taller_auth::Role;
    use taller_workshop::{Address, ClientPayload, NewCompany, NewMechanic, NewUser};

    fn company_input(document: &str) -> NewCompany {
        NewCompany {
            name: "Taller Uno".to_string(),
            document: document.to_string(),
            address: "Calle Mayor 1".to_string(),
            phone: "612345678".to_string(),
            logo: None,
        }
    }

    fn client_payload(name: &str, document: &str) -> ClientPayload {
        ClientPayload {
            name: name.to_string(),
            document_number: document.to_string(),
            address: Address::default(),
            telephone: "698765432".to_string(),
            email: None,
        }
    }

    fn user(name: &str, email: &str, role: Role, company: Option<TenantId>) -> User {
        User::create(
            NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: "$2b$10$hash".to_string(),
                role,
                company_id: company,
            }
            .validated()
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn company_document_is_globally_unique() {
        let store = InMemoryStore::new();
        CompanyStore::insert(&store, Company::create(company_input("B12345678")))
            .await
            .unwrap();
        let err = CompanyStore::insert(&store, Company::create(company_input("B12345678")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn cross_tenant_get_is_not_found() {
        let store = InMemoryStore::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();
        let created =
            ClientStore::insert(&store, Client::create(t1, client_payload("Ana", "11111111A")))
                .await
                .unwrap();

        // Same id, wrong tenant: indistinguishable from a nonexistent id.
        let err = ClientStore::get(&store, t2, created.id).await.unwrap_err();
        assert_eq!(err, DomainError::NotFound);
        assert!(ClientStore::get(&store, t1, created.id).await.is_ok());
    }

    #[tokio::test]
    async fn client_uniqueness_is_scoped_to_the_tenant() {
        let store = InMemoryStore::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();
        ClientStore::insert(&store, Client::create(t1, client_payload("Ana", "11111111A")))
            .await
            .unwrap();

        // Same document under another tenant is fine.
        ClientStore::insert(&store, Client::create(t2, client_payload("Eva", "11111111A")))
            .await
            .unwrap();

        // Same document under the same tenant conflicts.
        let err =
            ClientStore::insert(&store, Client::create(t1, client_payload("Eva", "11111111A")))
                .await
                .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn search_is_diacritic_insensitive_on_the_term() {
        let store = InMemoryStore::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();
        ClientStore::insert(&store, Client::create(t1, client_payload("Pena", "11111111A")))
            .await
            .unwrap();

        let filter = SearchFilter::new(Some("Peña".to_string()));
        let page = ClientStore::list(&store, t1, &filter, PageParams::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Pena");

        // The other tenant sees nothing for the same term.
        let empty = ClientStore::list(&store, t2, &filter, PageParams::default())
            .await
            .unwrap();
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn listing_orders_by_spanish_collation() {
        let store = InMemoryStore::new();
        let t = TenantId::new();
        for (name, doc) in [("Zoe", "11111111A"), ("Ángela", "22222222B"), ("Ana", "33333333C")] {
            ClientStore::insert(&store, Client::create(t, client_payload(name, doc)))
                .await
                .unwrap();
        }
        let page = ClientStore::list(&store, t, &SearchFilter::default(), PageParams::default())
            .await
            .unwrap();
        let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ángela", "Zoe"]);
    }

    #[tokio::test]
    async fn pagination_metadata() {
        let store = InMemoryStore::new();
        let t = TenantId::new();
        for i in 0..25 {
            ClientStore::insert(
                &store,
                Client::create(t, client_payload(&format!("Client {i:02}"), &format!("{i:07}0A"))),
            )
            .await
            .unwrap();
        }

        let p1 = ClientStore::list(&store, t, &SearchFilter::default(), PageParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(p1.items.len(), 10);
        assert_eq!(p1.total, 25);
        assert_eq!(p1.total_pages, 3);

        let p4 = ClientStore::list(&store, t, &SearchFilter::default(), PageParams::new(4, 10))
            .await
            .unwrap();
        assert!(p4.items.is_empty());
        assert_eq!(p4.total_pages, 3);
        assert_eq!(p4.current_page, 4);
    }

    #[tokio::test]
    async fn user_email_is_global_across_tenants() {
        let store = InMemoryStore::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();
        UserStore::insert(&store, user("Ana", "ana@taller.es", Role::Admin, Some(t1)))
            .await
            .unwrap();

        // Unlike clients, the same email under ANOTHER tenant still conflicts.
        let err = UserStore::insert(&store, user("Eva", "ana@taller.es", Role::Admin, Some(t2)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn scoped_user_listing_hides_other_tenants() {
        let store = InMemoryStore::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();
        UserStore::insert(&store, user("Ana", "ana@t1.es", Role::Admin, Some(t1)))
            .await
            .unwrap();
        UserStore::insert(&store, user("Eva", "eva@t2.es", Role::Admin, Some(t2)))
            .await
            .unwrap();
        UserStore::insert(&store, user("Root", "root@taller.es", Role::SuperAdmin, None))
            .await
            .unwrap();

        let scoped = UserStore::list(
            &store,
            &TenantScope::Tenant(t1),
            &SearchFilter::default(),
            PageParams::default(),
        )
        .await
        .unwrap();
        assert_eq!(scoped.items.len(), 1);
        assert_eq!(scoped.items[0].email, "ana@t1.es");

        let global = UserStore::list(
            &store,
            &TenantScope::Global,
            &SearchFilter::default(),
            PageParams::default(),
        )
        .await
        .unwrap();
        assert_eq!(global.items.len(), 3);
    }

    #[tokio::test]
    async fn mechanic_crud_is_tenant_scoped() {
        let store = InMemoryStore::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();
        let mechanic = MechanicStore::insert(
            &store,
            Mechanic::create(
                t1,
                NewMechanic {
                    name: "Marta".to_string(),
                    telephone: "611111111".to_string(),
                }
                .validated()
                .unwrap(),
            ),
        )
        .await
        .unwrap();

        assert_eq!(
            MechanicStore::remove(&store, t2, mechanic.id).await.unwrap_err(),
            DomainError::NotFound
        );
        assert!(MechanicStore::remove(&store, t1, mechanic.id).await.is_ok());
    }
}
