//! Job (commessa) routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    extractors::TenantContext,
    list_version::not_modified,
    response::{internal_error, not_found, validation_fields},
};
use miosaas_db::{
    CommessaRepository, entities::sea_orm_active_enums::CommessaStato,
    repositories::CommessaInput,
};
use miosaas_shared::types::{ClienteId, CommessaId, PageRequest, PageResponse};

const RESOURCE: &str = "commesse";

/// Creates the commesse router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/commesse", get(list_commesse).post(create_commessa))
        .route("/commesse/{id}", get(get_commessa).put(update_commessa))
}

/// Create/update payload for a commessa.
#[derive(Debug, Deserialize)]
pub struct CommessaPayload {
    /// Job code, unique within the company.
    pub codice: String,
    /// Description.
    pub descrizione: String,
    /// Optional customer the job is for.
    #[serde(default)]
    pub cliente_id: Option<ClienteId>,
    /// Lifecycle state; defaults to aperta.
    #[serde(default)]
    pub stato: Option<CommessaStato>,
    /// Site address.
    #[serde(default)]
    pub indirizzo: Option<String>,
    /// Start date.
    #[serde(default)]
    pub data_inizio: Option<NaiveDate>,
    /// End date.
    #[serde(default)]
    pub data_fine: Option<NaiveDate>,
}

impl CommessaPayload {
    fn validate(&self) -> Option<axum::response::Response> {
        let mut fields = serde_json::Map::new();
        if self.codice.trim().is_empty() {
            fields.insert("codice".into(), json!("Campo obbligatorio"));
        }
        if self.descrizione.trim().is_empty() {
            fields.insert("descrizione".into(), json!("Campo obbligatorio"));
        }
        if let (Some(inizio), Some(fine)) = (self.data_inizio, self.data_fine) {
            if fine < inizio {
                fields.insert("data_fine".into(), json!("Data non valida"));
            }
        }

        if fields.is_empty() {
            None
        } else {
            Some(validation_fields(fields))
        }
    }

    fn into_input(self) -> CommessaInput {
        CommessaInput {
            codice: self.codice.trim().to_string(),
            descrizione: self.descrizione.trim().to_string(),
            cliente_id: self.cliente_id.map(ClienteId::into_inner),
            stato: self.stato.unwrap_or(CommessaStato::Aperta),
            indirizzo: self.indirizzo,
            data_inizio: self.data_inizio,
            data_fine: self.data_fine,
        }
    }
}

/// GET /commesse - List jobs, with conditional GET via ETag.
async fn list_commesse(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let etag = state.list_versions.etag(tenant.company_id, RESOURCE);
    if let Some(status) = not_modified(&headers, &etag) {
        return status.into_response();
    }

    let repo = CommessaRepository::new((*state.db).clone());
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
            error!(error = %e, company_id = %tenant.company_id, "Failed to list commesse");
            internal_error()
        }
    }
}

/// GET /commesse/{id} - Fetch one job.
async fn get_commessa(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<CommessaId>,
) -> impl IntoResponse {
    let repo = CommessaRepository::new((*state.db).clone());
    match repo.find_by_id(tenant.company_id, id.into_inner()).await {
        Ok(Some(commessa)) => (StatusCode::OK, Json(commessa)).into_response(),
        Ok(None) => not_found("Commessa non trovata"),
        Err(e) => {
            error!(error = %e, "Failed to fetch commessa");
            internal_error()
        }
    }
}

/// POST /commesse - Create a job.
async fn create_commessa(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CommessaPayload>,
) -> impl IntoResponse {
    if let Some(rejection) = payload.validate() {
        return rejection;
    }

    let repo = CommessaRepository::new((*state.db).clone());
    match repo.create(tenant.company_id, payload.into_input()).await {
        Ok(commessa) => {
            info!(commessa_id = %commessa.id, codice = %commessa.codice, "Commessa created");
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::CREATED, Json(commessa)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create commessa");
            internal_error()
        }
    }
}

/// PUT /commesse/{id} - Update a job.
async fn update_commessa(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<CommessaId>,
    Json(payload): Json<CommessaPayload>,
) -> impl IntoResponse {
    if let Some(rejection) = payload.validate() {
        return rejection;
    }

    let repo = CommessaRepository::new((*state.db).clone());
    match repo
        .update(tenant.company_id, id.into_inner(), payload.into_input())
        .await
    {
        Ok(Some(commessa)) => {
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::OK, Json(commessa)).into_response()
        }
        Ok(None) => not_found("Commessa non trovata"),
        Err(e) => {
            error!(error = %e, "Failed to update commessa");
            internal_error()
        }
    }
}
