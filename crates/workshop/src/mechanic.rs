//! Mechanic entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taller_core::{DomainResult, MechanicId, TenantId};

use crate::validate;

/// A mechanic on a workshop's staff roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanic {
    pub id: MechanicId,
    pub name: String,
    pub telephone: String,
    #[serde(rename = "companyId")]
    pub company_id: TenantId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMechanic {
    pub name: String,
    pub telephone: String,
}

impl NewMechanic {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            name: validate::require_non_empty("name", &self.name)?,
            telephone: validate::require_non_empty("telephone", &self.telephone)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MechanicUpdate {
    pub name: Option<String>,
    pub telephone: Option<String>,
}

impl Mechanic {
    pub fn create(company_id: TenantId, input: NewMechanic) -> Self {
        let now = Utc::now();
        Self {
            id: MechanicId::new(),
            name: input.name,
            telephone: input.telephone,
            company_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: MechanicUpdate) -> DomainResult<()> {
        if let Some(name) = update.name {
            self.name = validate::require_non_empty("name", &name)?;
        }
        if let Some(telephone) = update.telephone {
            self.telephone = validate::require_non_empty("telephone", &telephone)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_update() {
        let company = TenantId::new();
        let mut mechanic = Mechanic::create(
            company,
            NewMechanic {
                name: "Marta".to_string(),
                telephone: "698765432".to_string(),
            }
            .validated()
            .unwrap(),
        );
        assert_eq!(mechanic.company_id, company);

        mechanic
            .apply(MechanicUpdate {
                telephone: Some("611111111".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(mechanic.telephone, "611111111");
    }

    #[test]
    fn blank_name_is_rejected() {
        let input = NewMechanic {
            name: " ".to_string(),
            telephone: "612345678".to_string(),
        };
        assert!(input.validated().is_err());
    }
}
