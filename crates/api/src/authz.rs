//! Route-level role gate.
//!
//! One middleware, many allow-lists: each router composes
//! [`taller_auth::RoleGate`] values as layer state, so adding a new surface
//! is a one-line gate choice instead of a new conditional.

use axum::{extract::State, middleware::Next, response::Response};

use taller_auth::RoleGate;

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

pub async fn require_roles(
    State(gate): State<RoleGate>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = req
        .extensions()
        .get::<PrincipalContext>()
        .map(|p| p.claims().clone());

    gate.check(claims.as_ref())?;

    Ok(next.run(req).await)
}
