//! Consistent error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use taller_auth::AuthzError;
use taller_core::DomainError;

/// Wrapper turning domain errors into HTTP responses.
///
/// The mapping is 1:1 and total: nothing crosses the controller boundary
/// unhandled except as a 500.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthenticated => Self(DomainError::Unauthenticated),
            AuthzError::Forbidden => Self(DomainError::forbidden("insufficient role")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self.0 {
            DomainError::Unauthenticated => {
                json_error(StatusCode::UNAUTHORIZED, "unauthenticated", self.0.to_string())
            }
            DomainError::MissingTenant => {
                json_error(StatusCode::UNAUTHORIZED, "missing_tenant", self.0.to_string())
            }
            DomainError::Forbidden(msg) => {
                json_error(StatusCode::FORBIDDEN, "forbidden", msg.clone())
            }
            DomainError::InvalidInput(msg) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
            }
            DomainError::NotFound => {
                json_error(StatusCode::NOT_FOUND, "not_found", "not found")
            }
            DomainError::Conflict(msg) => {
                json_error(StatusCode::CONFLICT, "conflict", msg.clone())
            }
            DomainError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "storage unavailable");
                json_error(StatusCode::SERVICE_UNAVAILABLE, "unavailable", "storage unavailable")
            }
            DomainError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
