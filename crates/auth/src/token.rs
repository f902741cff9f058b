//! Token issuing and verification.
//!
//! Tokens are opaque to the rest of the system: callers see `issue`/`verify`
//! and the claims, nothing else. The HS256 implementation signs with a shared
//! secret and a fixed 7-day expiry window.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AuthClaims;

/// Token lifetime: 7 days.
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature mismatch, expiry, malformed token, or incomplete claims.
    #[error("invalid token")]
    Invalid,

    /// Signing failed (key material problem).
    #[error("token signing failed")]
    Signing,
}

/// Issues and verifies signed identity tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, claims: &AuthClaims) -> Result<String, TokenError>;
    fn verify(&self, token: &str) -> Result<AuthClaims, TokenError>;
}

/// Wire shape of the signed payload: identity claims plus the registered
/// time claims jsonwebtoken validates.
#[derive(Debug, Serialize, Deserialize)]
struct SignedClaims {
    #[serde(flatten)]
    identity: AuthClaims,
    iat: i64,
    exp: i64,
}

/// HS256 token service over a shared secret.
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenService for Hs256TokenService {
    fn issue(&self, claims: &AuthClaims) -> Result<String, TokenError> {
        let now = Utc::now();
        let payload = SignedClaims {
            identity: claims.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<SignedClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;
        Ok(data.claims.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use taller_core::{TenantId, UserId};

    fn service() -> Hs256TokenService {
        Hs256TokenService::new(b"test-secret")
    }

    #[test]
    fn issue_verify_roundtrip() {
        let svc = service();
        let claims = AuthClaims::new(UserId::new(), Role::Admin, Some(TenantId::new()));
        let token = svc.issue(&claims).unwrap();
        assert_eq!(svc.verify(&token).unwrap(), claims);
    }

    #[test]
    fn top_level_claims_carry_no_tenant() {
        let svc = service();
        let claims = AuthClaims::new(UserId::new(), Role::SuperAdmin, None);
        let token = svc.issue(&claims).unwrap();
        assert_eq!(svc.verify(&token).unwrap().company_id, None);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let claims = AuthClaims::new(UserId::new(), Role::Admin, Some(TenantId::new()));
        let token = svc.issue(&claims).unwrap();

        let other = Hs256TokenService::new(b"other-secret");
        assert_eq!(other.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_eq!(service().verify("not.a.jwt").unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn incomplete_payload_is_rejected() {
        // A correctly-signed token whose payload lacks `sub`/`role` must not
        // verify: the decoded claims would be unusable downstream.
        #[derive(serde::Serialize)]
        struct Partial {
            exp: i64,
        }

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                exp: (Utc::now() + Duration::days(1)).timestamp(),
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(service().verify(&token).unwrap_err(), TokenError::Invalid);
    }
}
