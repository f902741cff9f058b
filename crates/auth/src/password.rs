//! Password hashing (bcrypt).
//!
//! Hashing internals are delegated to the `bcrypt` crate; callers only see
//! hash-and-verify. The hash is never serialized into any response payload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),
}

pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(plain, bcrypt::DEFAULT_COST)?)
}

/// Constant result shape: a storage/parse error counts as a non-match so the
/// login path stays a uniform invalid-credentials answer.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}
