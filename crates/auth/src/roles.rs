//! Role model.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of roles.
///
/// `SuperAdmin` is the only top-level role: it operates across tenants and is
/// the only role allowed to exist without a company. Everything else is
/// tenant-bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Mechanic,
    Administrative,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Mechanic => "MECHANIC",
            Role::Administrative => "ADMINISTRATIVE",
        }
    }

    pub fn is_top_level(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "MECHANIC" => Ok(Role::Mechanic),
            "ADMINISTRATIVE" => Ok(Role::Administrative),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Parse failure for a role value outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"SUPER_ADMIN\"");
        let back: Role = serde_json::from_str("\"ADMINISTRATIVE\"").unwrap();
        assert_eq!(back, Role::Administrative);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"ROOT\"").is_err());
        assert!("root".parse::<Role>().is_err());
    }
}
