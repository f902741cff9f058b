//! HTTP application wiring (axum router + service wiring).
//!
//! Folder layout:
//! - `services.rs`: store/token wiring behind `AppServices`
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taller_auth::gate::{ADMIN_GATE, SUPER_ADMIN_GATE};

use crate::{authz, middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Every protected route runs the same chain: identity resolver → tenant
/// scope resolver → role gate → handler.
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
    };

    // Tenant administration: admins and the top-level role.
    let admin = Router::new()
        .route("/users/register", post(routes::users::register))
        .route("/users", get(routes::users::list))
        .route(
            "/users/:id",
            get(routes::users::get)
                .put(routes::users::update)
                .delete(routes::users::remove),
        )
        .nest("/clients", routes::clients::router())
        .nest("/mechanics", routes::mechanics::router())
        .layer(axum::middleware::from_fn_with_state(
            ADMIN_GATE,
            authz::require_roles,
        ));

    // Tenant provisioning: top-level role only.
    let super_admin = Router::new()
        .route("/companies/new", post(routes::companies::create))
        .layer(axum::middleware::from_fn_with_state(
            SUPER_ADMIN_GATE,
            authz::require_roles,
        ));

    let protected = admin.merge(super_admin).layer(
        axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/users/login", post(routes::users::login))
        .merge(protected)
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
