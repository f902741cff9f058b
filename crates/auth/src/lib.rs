//! `taller-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it defines
//! roles, token claims, the token service, the role gate, and the rule tables
//! governing user management. The API layer composes these per route.

pub mod claims;
pub mod gate;
pub mod password;
pub mod roles;
pub mod rules;
pub mod token;

pub use claims::AuthClaims;
pub use gate::{AuthzError, RoleGate};
pub use password::{hash_password, verify_password};
pub use roles::Role;
pub use token::{Hs256TokenService, TokenError, TokenService};
