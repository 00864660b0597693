//! Supplier registry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    extractors::TenantContext,
    list_version::not_modified,
    response::{internal_error, not_found, validation_fields},
};
use miosaas_db::{FornitoreRepository, repositories::FornitoreInput};
use miosaas_shared::types::{FornitoreId, PageRequest, PageResponse};

const RESOURCE: &str = "fornitori";

/// Creates the fornitori router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fornitori", get(list_fornitori).post(create_fornitore))
        .route("/fornitori/{id}", get(get_fornitore).put(update_fornitore))
}

/// Create/update payload for a fornitore.
#[derive(Debug, Deserialize)]
pub struct FornitorePayload {
    /// Business name.
    pub denominazione: String,
    /// VAT number.
    #[serde(default)]
    pub partita_iva: Option<String>,
    /// Fiscal code.
    #[serde(default)]
    pub codice_fiscale: Option<String>,
    /// Address.
    #[serde(default)]
    pub indirizzo: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub telefono: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub note: Option<String>,
}

impl FornitorePayload {
    fn validate(&self) -> Option<axum::response::Response> {
        if self.denominazione.trim().is_empty() {
            let mut fields = serde_json::Map::new();
            fields.insert("denominazione".into(), json!("Campo obbligatorio"));
            return Some(validation_fields(fields));
        }
        None
    }

    fn into_input(self) -> FornitoreInput {
        FornitoreInput {
            denominazione: self.denominazione.trim().to_string(),
            partita_iva: self.partita_iva,
            codice_fiscale: self.codice_fiscale,
            indirizzo: self.indirizzo,
            email: self.email,
            telefono: self.telefono,
            note: self.note,
        }
    }
}

/// GET /fornitori - List suppliers, with conditional GET via ETag.
async fn list_fornitori(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let etag = state.list_versions.etag(tenant.company_id, RESOURCE);
    if let Some(status) = not_modified(&headers, &etag) {
        return status.into_response();
    }

    let repo = FornitoreRepository::new((*state.db).clone());
    match repo.list(tenant.company_id, &page).await {
        Ok((rows, total)) => {
            let body = PageResponse::new(rows, page.page, page.per_page, total);
            let mut response = (StatusCode::OK, Json(body)).into_response();
            if let Ok(value) = HeaderValue::from_str(&etag) {
                response.headers_mut().insert(header::ETAG, value);
            }
            response
        }
        Err(e) => {
            error!(error = %e, company_id = %tenant.company_id, "Failed to list fornitori");
            internal_error()
        }
    }
}

/// GET /fornitori/{id} - Fetch one supplier.
async fn get_fornitore(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<FornitoreId>,
) -> impl IntoResponse {
    let repo = FornitoreRepository::new((*state.db).clone());
    match repo.find_by_id(tenant.company_id, id.into_inner()).await {
        Ok(Some(fornitore)) => (StatusCode::OK, Json(fornitore)).into_response(),
        Ok(None) => not_found("Fornitore non trovato"),
        Err(e) => {
            error!(error = %e, "Failed to fetch fornitore");
            internal_error()
        }
    }
}

/// POST /fornitori - Create a supplier.
async fn create_fornitore(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<FornitorePayload>,
) -> impl IntoResponse {
    if let Some(rejection) = payload.validate() {
        return rejection;
    }

    let repo = FornitoreRepository::new((*state.db).clone());
    match repo.create(tenant.company_id, payload.into_input()).await {
        Ok(fornitore) => {
            info!(fornitore_id = %fornitore.id, company_id = %tenant.company_id, "Fornitore created");
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::CREATED, Json(fornitore)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create fornitore");
            internal_error()
        }
    }
}

/// PUT /fornitori/{id} - Update a supplier.
async fn update_fornitore(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<FornitoreId>,
    Json(payload): Json<FornitorePayload>,
) -> impl IntoResponse {
    if let Some(rejection) = payload.validate() {
        return rejection;
    }

    let repo = FornitoreRepository::new((*state.db).clone());
    match repo
        .update(tenant.company_id, id.into_inner(), payload.into_input())
        .await
    {
        Ok(Some(fornitore)) => {
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::OK, Json(fornitore)).into_response()
        }
        Ok(None) => not_found("Fornitore non trovato"),
        Err(e) => {
            error!(error = %e, "Failed to update fornitore");
            internal_error()
        }
    }
}
