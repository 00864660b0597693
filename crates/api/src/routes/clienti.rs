//! Customer registry routes.

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
use miosaas_db::{ClienteRepository, repositories::ClienteInput};
use miosaas_shared::types::{ClienteId, PageRequest, PageResponse};

const RESOURCE: &str = "clienti";

/// Creates the clienti router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clienti", get(list_clienti).post(create_cliente))
        .route("/clienti/{id}", get(get_cliente).put(update_cliente))
}

/// Create/update payload for a cliente.
#[derive(Debug, Deserialize)]
pub struct ClientePayload {
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

impl ClientePayload {
    fn validate(&self) -> Option<axum::response::Response> {
        if self.denominazione.trim().is_empty() {
            let mut fields = serde_json::Map::new();
            fields.insert("denominazione".into(), json!("Campo obbligatorio"));
            return Some(validation_fields(fields));
        }
        None
    }

    fn into_input(self) -> ClienteInput {
        ClienteInput {
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

/// GET /clienti - List customers, with conditional GET via ETag.
async fn list_clienti(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let etag = state.list_versions.etag(tenant.company_id, RESOURCE);
    if let Some(status) = not_modified(&headers, &etag) {
        return status.into_response();
    }

    let repo = ClienteRepository::new((*state.db).clone());
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
            error!(error = %e, company_id = %tenant.company_id, "Failed to list clienti");
            internal_error()
        }
    }
}

/// GET /clienti/{id} - Fetch one customer.
async fn get_cliente(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<ClienteId>,
) -> impl IntoResponse {
    let repo = ClienteRepository::new((*state.db).clone());
    match repo.find_by_id(tenant.company_id, id.into_inner()).await {
        Ok(Some(cliente)) => (StatusCode::OK, Json(cliente)).into_response(),
        Ok(None) => not_found("Cliente non trovato"),
        Err(e) => {
            error!(error = %e, "Failed to fetch cliente");
            internal_error()
        }
    }
}

/// POST /clienti - Create a customer.
async fn create_cliente(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<ClientePayload>,
) -> impl IntoResponse {
    if let Some(rejection) = payload.validate() {
        return rejection;
    }

    let repo = ClienteRepository::new((*state.db).clone());
    match repo.create(tenant.company_id, payload.into_input()).await {
        Ok(cliente) => {
            info!(cliente_id = %cliente.id, company_id = %tenant.company_id, "Cliente created");
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::CREATED, Json(cliente)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create cliente");
            internal_error()
        }
    }
}

/// PUT /clienti/{id} - Update a customer.
async fn update_cliente(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<ClienteId>,
    Json(payload): Json<ClientePayload>,
) -> impl IntoResponse {
    if let Some(rejection) = payload.validate() {
        return rejection;
    }

    let repo = ClienteRepository::new((*state.db).clone());
    match repo
        .update(tenant.company_id, id.into_inner(), payload.into_input())
        .await
    {
        Ok(Some(cliente)) => {
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::OK, Json(cliente)).into_response()
        }
        Ok(None) => not_found("Cliente non trovato"),
        Err(e) => {
            error!(error = %e, "Failed to update cliente");
            internal_error()
        }
    }
}
