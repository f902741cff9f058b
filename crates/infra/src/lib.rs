//! `taller-infra` — storage backends and workflows.
//!
//! Storage is reached only through the traits in [`store`]; the in-memory
//! backend serves dev/test, the Postgres backend serves deployments. The
//! provisioning workflow and the super-admin seed live here because they
//! compose several stores.

pub mod provisioning;
pub mod seed;
pub mod store;

pub use provisioning::{CompanyProvisioning, ProvisionCompany, Provisioned};
pub use store::{
    ClientStore, CompanyStore, InMemoryStore, MechanicStore, PostgresStore, SearchFilter,
    UserStore,
};
