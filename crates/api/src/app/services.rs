//! Infrastructure wiring for the HTTP layer.

use std::sync::Arc;

use taller_auth::TokenService;
use taller_core::DomainResult;
use taller_infra::{
    ClientStore, CompanyProvisioning, CompanyStore, InMemoryStore, MechanicStore, PostgresStore,
    UserStore,
};

/// Shared state for all handlers: store trait objects plus the token service.
///
/// The backend is chosen at startup: `DATABASE_URL` present → Postgres,
/// absent → in-memory (dev/test). Companies are only written through the
/// provisioning workflow, so no bare company store is exposed here.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub clients: Arc<dyn ClientStore>,
    pub mechanics: Arc<dyn MechanicStore>,
    pub tokens: Arc<dyn TokenService>,
    pub provisioning: Arc<CompanyProvisioning>,
}

impl AppServices {
    pub fn in_memory(tokens: Arc<dyn TokenService>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::from_store(store.clone(), store.clone(), store.clone(), store, tokens)
    }

    pub async fn postgres(database_url: &str, tokens: Arc<dyn TokenService>) -> DomainResult<Self> {
        let store = Arc::new(PostgresStore::connect(database_url).await?);
        Ok(Self::from_store(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            tokens,
        ))
    }

    fn from_store(
        companies: Arc<dyn CompanyStore>,
        users: Arc<dyn UserStore>,
        clients: Arc<dyn ClientStore>,
        mechanics: Arc<dyn MechanicStore>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let provisioning = Arc::new(CompanyProvisioning::new(companies, users.clone()));
        Self {
            users,
            clients,
            mechanics,
            tokens,
            provisioning,
        }
    }
}
