//! Client entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taller_core::{ClientId, DomainResult, TenantId, VehicleId};

use crate::validate;

/// Postal address subobject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "zipCode")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A workshop client.
///
/// # Invariants
/// - `company_id` is required and immutable after creation.
/// - `document_number` and `email` are unique within the owning company only;
///   two tenants may each have a client with the same document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(rename = "documentNumber")]
    pub document_number: String,
    #[serde(default)]
    pub address: Address,
    pub telephone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "companyId")]
    pub company_id: TenantId,
    pub active: bool,
    /// Vehicle references (boundary only; vehicles have no CRUD surface here).
    #[serde(default)]
    pub vehicles: Vec<VehicleId>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Any tenant identifier a caller smuggles into the body is
/// ignored: the repository stamps the resolved scope.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientPayload {
    pub name: String,
    #[serde(rename = "documentNumber")]
    pub document_number: String,
    #[serde(default)]
    pub address: Address,
    pub telephone: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl ClientPayload {
    pub fn validated(self) -> DomainResult<Self> {
        let email = match self.email.as_deref() {
            Some(e) if !e.trim().is_empty() => Some(validate::require_email(e)?),
            _ => None,
        };
        Ok(Self {
            name: validate::require_non_empty("name", &self.name)?,
            document_number: validate::require_non_empty("documentNumber", &self.document_number)?,
            address: self.address,
            telephone: validate::require_non_empty("telephone", &self.telephone)?,
            email,
        })
    }
}

/// Partial update. `id` and `companyId` are not representable here, so a
/// caller can neither move a client to another tenant nor rewrite identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    pub name: Option<String>,
    #[serde(rename = "documentNumber")]
    pub document_number: Option<String>,
    pub address: Option<Address>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

impl Client {
    pub fn create(company_id: TenantId, payload: ClientPayload) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            name: payload.name,
            document_number: payload.document_number,
            address: payload.address,
            telephone: payload.telephone,
            email: payload.email,
            company_id,
            active: true,
            vehicles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: ClientUpdate) -> DomainResult<()> {
        if let Some(name) = update.name {
            self.name = validate::require_non_empty("name", &name)?;
        }
        if let Some(document_number) = update.document_number {
            self.document_number =
                validate::require_non_empty("documentNumber", &document_number)?;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(telephone) = update.telephone {
            self.telephone = validate::require_non_empty("telephone", &telephone)?;
        }
        if let Some(email) = update.email {
            self.email = if email.trim().is_empty() {
                None
            } else {
                Some(validate::require_email(&email)?)
            };
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ClientPayload {
        ClientPayload {
            name: "José Peña".to_string(),
            document_number: "12345678Z".to_string(),
            address: Address::default(),
            telephone: "612345678".to_string(),
            email: Some("Jose@Peña.es".to_string()),
        }
    }

    #[test]
    fn create_stamps_company_and_defaults() {
        let company = TenantId::new();
        let client = Client::create(company, payload().validated().unwrap());
        assert_eq!(client.company_id, company);
        assert!(client.active);
        assert!(client.vehicles.is_empty());
        assert_eq!(client.email.as_deref(), Some("jose@peña.es"));
    }

    #[test]
    fn update_keeps_identity_and_tenant() {
        let company = TenantId::new();
        let mut client = Client::create(company, payload().validated().unwrap());
        let id = client.id;
        client
            .apply(ClientUpdate {
                name: Some("Renamed".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(client.id, id);
        assert_eq!(client.company_id, company);
        assert_eq!(client.name, "Renamed");
    }

    #[test]
    fn required_fields_are_enforced() {
        let mut bad = payload();
        bad.telephone = String::new();
        assert!(bad.validated().is_err());
    }
}
