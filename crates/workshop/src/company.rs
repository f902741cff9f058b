//! Company (tenant) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taller_core::{DomainResult, TenantId};

use crate::validate;

/// A tenant: an isolated customer organization owning its own users, clients
/// and mechanics.
///
/// # Invariants
/// - `document` is unique process-wide.
/// - Companies are never hard-deleted; `active` is the only lifecycle flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: TenantId,
    pub name: String,
    pub document: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a company.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub document: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub logo: Option<String>,
}

impl NewCompany {
    /// Normalize and validate all fields; returns the normalized payload.
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            name: validate::require_non_empty("name", &self.name)?,
            document: validate::require_company_document(&self.document)?,
            address: validate::require_non_empty("address", &self.address)?,
            phone: validate::require_phone(&self.phone)?,
            logo: self.logo,
        })
    }
}

impl Company {
    pub fn create(input: NewCompany) -> Self {
        let now = Utc::now();
        Self {
            id: TenantId::new(),
            name: input.name,
            document: input.document,
            address: input.address,
            phone: input.phone,
            logo: input.logo,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewCompany {
        NewCompany {
            name: "Taller Pérez".to_string(),
            document: "b12345678".to_string(),
            address: "Calle Mayor 1".to_string(),
            phone: "612345678".to_string(),
            logo: None,
        }
    }

    #[test]
    fn create_normalizes_document() {
        let company = Company::create(input().validated().unwrap());
        assert_eq!(company.document, "B12345678");
        assert!(company.active);
    }

    #[test]
    fn missing_fields_fail_validation() {
        let mut bad = input();
        bad.address = "  ".to_string();
        assert!(bad.validated().is_err());
    }
}
