//! Request/response DTOs and JSON mapping helpers.

use serde::Deserialize;

use taller_auth::Role;
use taller_core::{Page, PageParams, TenantId};
use taller_infra::SearchFilter;
use taller_workshop::User;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Only honored for the top-level role; everyone else registers users
    /// under their own company, whatever the payload says.
    #[serde(default)]
    pub company_id: Option<TenantId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    pub document: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

/// Common listing query: search term, pagination, and the explicit tenant a
/// global caller must name. Page and limit arrive as raw strings so that
/// junk values fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub company_id: Option<TenantId>,
}

impl ListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::from_raw(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn filter(&self) -> SearchFilter {
        SearchFilter::new(self.search.clone())
    }
}

/// Tenant selector for single-resource routes (`?companyId=` for the
/// top-level role).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    #[serde(default)]
    pub company_id: Option<TenantId>,
}

// -------------------------
// JSON mapping
// -------------------------

/// User representation for responses. Built by hand so the credential hash
/// cannot leak through a derived serializer.
pub fn user_to_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.to_string(),
        "name": user.name,
        "email": user.email,
        "role": user.role,
        "companyId": user.company_id.map(|c| c.to_string()),
        "active": user.active,
        "createdAt": user.created_at.to_rfc3339(),
        "updatedAt": user.updated_at.to_rfc3339(),
    })
}

/// Listing envelope: items plus pagination metadata.
pub fn page_to_json<T: serde::Serialize>(page: Page<T>) -> serde_json::Value {
    serde_json::json!({
        "items": page.items,
        "pagination": {
            "total": page.total,
            "totalPages": page.total_pages,
            "currentPage": page.current_page,
            "limit": page.limit,
        },
    })
}
