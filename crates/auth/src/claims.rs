//! Token claims model (transport-agnostic).

use serde::{Deserialize, Serialize};

use taller_core::{TenantId, UserId};

use crate::Role;

/// The identity snapshot carried by a verified token.
///
/// This is the authoritative identity for the lifetime of a request: the API
/// layer never re-fetches the user from storage to re-validate it. Typed
/// deserialization guarantees `sub` and `role` are present and well-formed;
/// a token that decodes without them is rejected at verification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Role granted to the subject.
    pub role: Role,

    /// Owning tenant. `None` only for the top-level role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<TenantId>,
}

impl AuthClaims {
    pub fn new(sub: UserId, role: Role, company_id: Option<TenantId>) -> Self {
        Self {
            sub,
            role,
            company_id,
        }
    }
}
