//! Company provisioning route.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use taller_infra::ProvisionCompany;
use taller_workshop::NewCompany;

use crate::app::errors::ApiError;
use crate::app::{dto, services::AppServices};

/// POST /companies/new — role = SUPER_ADMIN.
///
/// Creates the tenant together with its first administrator; the workflow
/// guarantees neither outlives the other on failure.
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCompanyRequest>,
) -> Result<axum::response::Response, ApiError> {
    let provisioned = services
        .provisioning
        .provision(ProvisionCompany {
            company: NewCompany {
                name: body.name,
                document: body.document,
                address: body.address,
                phone: body.phone,
                logo: body.logo,
            },
            admin_name: body.admin_name,
            admin_email: body.admin_email,
            admin_password: body.admin_password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "company and admin created",
            "company": provisioned.company,
            "admin": dto::user_to_json(&provisioned.admin),
        })),
    )
        .into_response())
}
