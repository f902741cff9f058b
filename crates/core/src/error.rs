//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error taxonomy.
///
/// Every repository and resolver operation returns one of these; the HTTP
/// layer translates them 1:1 into status codes. Tenant-isolation failures are
/// folded into `NotFound` so cross-tenant existence never leaks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or invalid credential.
    #[error("unauthenticated")]
    Unauthenticated,

    /// A tenant-bound principal reached a scoped operation without a tenant.
    #[error("tenant scope unavailable")]
    MissingTenant,

    /// Valid credential, insufficient privilege.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Malformed or missing fields, malformed identifier.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Entity absent, or outside the caller's tenant scope (indistinguishable).
    #[error("not found")]
    NotFound,

    /// Uniqueness violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage backend unreachable or timed out.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Unexpected persistence or logic failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
