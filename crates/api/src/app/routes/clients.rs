//! Client routes: tenant-scoped CRUD with search and pagination.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use taller_core::ClientId;
use taller_workshop::{Client, ClientPayload, ClientUpdate};

use crate::app::errors::ApiError;
use crate::app::{dto, services::AppServices};
use crate::context::ScopeContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Query(query): Query<dto::ListQuery>,
) -> Result<axum::response::Response, ApiError> {
    let company_id = scope.effective_tenant(query.company_id)?;
    let page = services
        .clients
        .list(company_id, &query.filter(), query.page_params())
        .await?;

    Ok(Json(dto::page_to_json(page)).into_response())
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::ScopeQuery>,
) -> Result<axum::response::Response, ApiError> {
    let company_id = scope.effective_tenant(query.company_id)?;
    let id: ClientId = id.parse()?;
    let client = services.clients.get(company_id, id).await?;
    Ok(Json(client).into_response())
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Query(query): Query<dto::ScopeQuery>,
    Json(body): Json<ClientPayload>,
) -> Result<axum::response::Response, ApiError> {
    // The payload cannot name a tenant: the resolved scope is stamped on,
    // so nobody creates a client under a foreign company.
    let company_id = scope.effective_tenant(query.company_id)?;
    let payload = body.validated()?;
    let created = services.clients.insert(Client::create(company_id, payload)).await?;
    tracing::info!(client_id = %created.id, "client created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "client created",
            "client": created,
        })),
    )
        .into_response())
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::ScopeQuery>,
    Json(body): Json<ClientUpdate>,
) -> Result<axum::response::Response, ApiError> {
    let company_id = scope.effective_tenant(query.company_id)?;
    let id: ClientId = id.parse()?;

    // Scoped fetch first: an id under another tenant is a plain 404. The
    // update payload has no id/tenant fields to strip by construction.
    let mut client = services.clients.get(company_id, id).await?;
    client.apply(body)?;
    let updated = services.clients.update(client).await?;

    Ok(Json(serde_json::json!({
        "message": "client updated",
        "client": updated,
    }))
    .into_response())
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::ScopeQuery>,
) -> Result<axum::response::Response, ApiError> {
    let company_id = scope.effective_tenant(query.company_id)?;
    let id: ClientId = id.parse()?;
    let removed = services.clients.remove(company_id, id).await?;
    tracing::info!(client_id = %removed.id, "client removed");

    Ok(Json(serde_json::json!({
        "message": "client removed",
        "client": removed,
    }))
    .into_response())
}
