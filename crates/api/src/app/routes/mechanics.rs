//! Mechanic routes: tenant-scoped CRUD.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use taller_core::MechanicId;
use taller_workshop::{Mechanic, MechanicUpdate, NewMechanic};

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
        .mechanics
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
    let id: MechanicId = id.parse()?;
    let mechanic = services.mechanics.get(company_id, id).await?;
    Ok(Json(mechanic).into_response())
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Query(query): Query<dto::ScopeQuery>,
    Json(body): Json<NewMechanic>,
) -> Result<axum::response::Response, ApiError> {
    let company_id = scope.effective_tenant(query.company_id)?;
    let input = body.validated()?;
    let created = services
        .mechanics
        .insert(Mechanic::create(company_id, input))
        .await?;
    tracing::info!(mechanic_id = %created.id, "mechanic created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "mechanic created",
            "mechanic": created,
        })),
    )
        .into_response())
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(scope): Extension<ScopeContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::ScopeQuery>,
    Json(body): Json<MechanicUpdate>,
) -> Result<axum::response::Response, ApiError> {
    let company_id = scope.effective_tenant(query.company_id)?;
    let id: MechanicId = id.parse()?;

    let mut mechanic = services.mechanics.get(company_id, id).await?;
    mechanic.apply(body)?;
    let updated = services.mechanics.update(mechanic).await?;

    Ok(Json(serde_json::json!({
        "message": "mechanic updated",
        "mechanic": updated,
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
    let id: MechanicId = id.parse()?;
    let removed = services.mechanics.remove(company_id, id).await?;
    tracing::info!(mechanic_id = %removed.id, "mechanic removed");

    Ok(Json(serde_json::json!({
        "message": "mechanic removed",
        "mechanic": removed,
    }))
    .into_response())
}
