//! Company provisioning workflow.
//!
//! Creates a tenant together with its first administrator. The two inserts
//! are not a single storage transaction (the stores are independent trait
//! objects), so the workflow compensates: if the admin insert fails after the
//! company insert succeeded, the company is removed again. A tenant with zero
//! administrators must never survive this function.

use std::sync::Arc;

use taller_auth::{hash_password, Role};
use taller_core::{DomainError, DomainResult};
use taller_workshop::{validate, Company, NewCompany, NewUser, User};

use crate::store::{CompanyStore, UserStore};

/// Input: company attributes plus the initial administrator.
#[derive(Debug, Clone)]
pub struct ProvisionCompany {
    pub company: NewCompany,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

/// Result of a successful provisioning run.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub company: Company,
    pub admin: User,
}

pub struct CompanyProvisioning {
    companies: Arc<dyn CompanyStore>,
    users: Arc<dyn UserStore>,
}

impl CompanyProvisioning {
    pub fn new(companies: Arc<dyn CompanyStore>, users: Arc<dyn UserStore>) -> Self {
        Self { companies, users }
    }

    pub async fn provision(&self, input: ProvisionCompany) -> DomainResult<Provisioned> {
        // 1. Validate everything before touching storage.
        let company_input = input.company.validated()?;
        let admin_name = validate::require_non_empty("adminName", &input.admin_name)?;
        let admin_email = validate::require_email(&input.admin_email)?;
        let admin_password = validate::require_non_empty("adminPassword", &input.admin_password)?;

        // 2. Duplicate tenant guard.
        if self
            .companies
            .find_by_document(&company_input.document)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict("company already exists"));
        }

        // 3. Duplicate admin guard — user emails are global, so this checks
        // across ALL tenants.
        if self.users.find_by_email(&admin_email).await?.is_some() {
            return Err(DomainError::conflict("admin user already exists"));
        }

        // 4. Create the tenant.
        let company = self
            .companies
            .insert(Company::create(company_input))
            .await?;

        // 5. Create the administrator; roll the tenant back on failure.
        let admin = match self.create_admin(&company, admin_name, admin_email, admin_password).await
        {
            Ok(admin) => admin,
            Err(err) => {
                if let Err(rollback) = self.companies.remove(company.id).await {
                    tracing::warn!(
                        company_id = %company.id,
                        error = %rollback,
                        "failed to roll back company after admin creation failure"
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(company_id = %company.id, admin_id = %admin.id, "company provisioned");
        Ok(Provisioned { company, admin })
    }

    async fn create_admin(
        &self,
        company: &Company,
        name: String,
        email: String,
        password: String,
    ) -> DomainResult<User> {
        let password_hash =
            hash_password(&password).map_err(|e| DomainError::internal(e.to_string()))?;

        let admin = NewUser {
            name,
            email,
            password_hash,
            role: Role::Admin,
            company_id: Some(company.id),
        }
        .validated()?;

        self.users.insert(User::create(admin)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use taller_core::TenantScope;

    fn input(document: &str, email: &str) -> ProvisionCompany {
        ProvisionCompany {
            company: NewCompany {
                name: "Taller Uno".to_string(),
                document: document.to_string(),
                address: "Calle Mayor 1".to_string(),
                phone: "612345678".to_string(),
                logo: None,
            },
            admin_name: "Ana".to_string(),
            admin_email: email.to_string(),
            admin_password: "s3cret".to_string(),
        }
    }

    fn workflow() -> (Arc<InMemoryStore>, CompanyProvisioning) {
        let store = Arc::new(InMemoryStore::new());
        let workflow = CompanyProvisioning::new(store.clone(), store.clone());
        (store, workflow)
    }

    #[tokio::test]
    async fn provisions_company_with_admin() {
        let (store, workflow) = workflow();
        let out = workflow
            .provision(input("B12345678", "ana@taller.es"))
            .await
            .unwrap();

        assert_eq!(out.admin.role, Role::Admin);
        assert_eq!(out.admin.company_id, Some(out.company.id));
        // The admin is reachable under the new tenant's scope.
        let scope = TenantScope::Tenant(out.company.id);
        assert!(UserStore::get(&*store, &scope, out.admin.id).await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_document_conflicts_without_partial_state() {
        let (store, workflow) = workflow();
        workflow
            .provision(input("B12345678", "ana@taller.es"))
            .await
            .unwrap();

        let err = workflow
            .provision(input("B12345678", "eva@taller.es"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // No second admin was created.
        assert!(UserStore::find_by_email(&*store, "eva@taller.es")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_admin_email_rolls_back_the_company() {
        let (store, workflow) = workflow();
        workflow
            .provision(input("B12345678", "ana@taller.es"))
            .await
            .unwrap();

        // Different document, same admin email: the guard fires before the
        // company insert, so nothing is left behind.
        let err = workflow
            .provision(input("B87654321", "ana@taller.es"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(CompanyStore::find_by_document(&*store, "B87654321")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn missing_admin_fields_are_invalid_input() {
        let (_, workflow) = workflow();
        let mut bad = input("B12345678", "ana@taller.es");
        bad.admin_password = String::new();
        let err = workflow.provision(bad).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
