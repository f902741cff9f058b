//! `taller-workshop` — workshop domain model.
//!
//! Entities (companies, users, clients, mechanics), their input payloads, and
//! the validation layer that runs ahead of persistence. Storage schemas carry
//! no validation of their own.

pub mod client;
pub mod company;
pub mod mechanic;
pub mod user;
pub mod validate;

pub use client::{Address, Client, ClientPayload, ClientUpdate};
pub use company::{Company, NewCompany};
pub use mechanic::{Mechanic, MechanicUpdate, NewMechanic};
pub use user::{NewUser, User, UserUpdate};
