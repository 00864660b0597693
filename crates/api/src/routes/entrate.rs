//! Revenue ledger entry routes.
//!
//! Revenue entries are always invoices; the form enters the taxable base
//! (imponibile) and the server derives iva and importo_totale.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    AppState,
    extractors::TenantContext,
    list_version::not_modified,
    response::{internal_error, ledger_error, not_found, validation_error},
};
use miosaas_core::entry::{Direction, EntryDraft, EntryProfile, normalize};
use miosaas_db::EntrataRepository;
use miosaas_shared::types::{CommessaId, EntrataId, PageRequest, PageResponse};

const RESOURCE: &str = "entrate";

/// Creates the entrate router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entrate", get(list_entrate).post(create_entrata))
        .route(
            "/entrate/{id}",
            axum::routing::put(update_entrata).delete(delete_entrata),
        )
}

/// List filter: optional commessa. Pagination params are extracted
/// separately; `serde_urlencoded` cannot deserialize numbers through
/// `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    commessa_id: Option<CommessaId>,
}

/// Entry payload exactly as the form submits it: raw strings.
#[derive(Debug, Deserialize)]
pub struct EntrataPayload {
    /// Owning commessa.
    pub commessa_id: CommessaId,
    /// Invoice number.
    #[serde(default)]
    pub numero_fattura: String,
    /// Customer name.
    #[serde(default)]
    pub cliente: String,
    /// Category.
    #[serde(default)]
    pub tipologia: String,
    /// Issue date, `YYYY-MM-DD`.
    #[serde(default)]
    pub emissione_fattura: String,
    /// Payment date, `YYYY-MM-DD`.
    #[serde(default)]
    pub data_pagamento: String,
    /// Taxable base as entered.
    #[serde(default)]
    pub imponibile: String,
    /// VAT rate as entered.
    #[serde(default)]
    pub aliquota_iva: String,
    /// Payment status.
    #[serde(default)]
    pub stato: String,
    /// Payment method.
    #[serde(default)]
    pub metodo_pagamento: String,
}

impl EntrataPayload {
    fn draft(&self) -> EntryDraft {
        EntryDraft {
            commessa_id: self.commessa_id.into_inner(),
            numero_fattura: self.numero_fattura.clone(),
            counterparty: self.cliente.clone(),
            tipologia: self.tipologia.clone(),
            emissione_fattura: self.emissione_fattura.clone(),
            data_pagamento: self.data_pagamento.clone(),
            importo_totale: String::new(),
            imponibile: self.imponibile.clone(),
            iva: String::new(),
            aliquota_iva: self.aliquota_iva.clone(),
            stato: self.stato.clone(),
            metodo_pagamento: self.metodo_pagamento.clone(),
        }
    }
}

const fn profile() -> EntryProfile {
    EntryProfile::invoice(Direction::Revenue)
}

/// GET /entrate - List revenue entries, with conditional GET via ETag.
async fn list_entrate(
    State(state): State<AppState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let etag = state.list_versions.etag(tenant.company_id, RESOURCE);
    if let Some(status) = not_modified(&headers, &etag) {
        return status.into_response();
    }

    let repo = EntrataRepository::new((*state.db).clone());
    match repo
        .list(
            tenant.company_id,
            query.commessa_id.map(CommessaId::into_inner),
            &page,
        )
        .await
    {
        Ok((rows, total)) => {
            let body = PageResponse::new(rows, page.page, page.per_page, total);
            let mut response = (StatusCode::OK, Json(body)).into_response();
            if let Ok(value) = HeaderValue::from_str(&etag) {
                response.headers_mut().insert(header::ETAG, value);
            }
            response
        }
        Err(e) => {
            error!(error = %e, company_id = %tenant.company_id, "Failed to list entrate");
            internal_error()
        }
    }
}

/// POST /entrate - Create a revenue entry.
async fn create_entrata(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<EntrataPayload>,
) -> impl IntoResponse {
    let entry = match normalize(&payload.draft(), profile()) {
        Ok(entry) => entry,
        Err(errors) => return validation_error(&errors),
    };

    let repo = EntrataRepository::new((*state.db).clone());
    match repo.create(tenant.company_id, &entry).await {
        Ok(entrata) => {
            info!(entrata_id = %entrata.id, commessa_id = %entrata.commessa_id, "Entrata created");
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::CREATED, Json(entrata)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// PUT /entrate/{id} - Replace a revenue entry (last write wins).
async fn update_entrata(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<EntrataId>,
    Json(payload): Json<EntrataPayload>,
) -> impl IntoResponse {
    let entry = match normalize(&payload.draft(), profile()) {
        Ok(entry) => entry,
        Err(errors) => return validation_error(&errors),
    };

    let repo = EntrataRepository::new((*state.db).clone());
    match repo.update(tenant.company_id, id.into_inner(), &entry).await {
        Ok(entrata) => {
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::OK, Json(entrata)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// DELETE /entrate/{id} - Delete a revenue entry and its stored attachment.
async fn delete_entrata(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<EntrataId>,
) -> impl IntoResponse {
    let repo = EntrataRepository::new((*state.db).clone());

    let allegato_key = match repo.find_by_id(tenant.company_id, id.into_inner()).await {
        Ok(Some(row)) => row.allegato_key,
        Ok(None) => return not_found("Voce non trovata"),
        Err(e) => {
            error!(error = %e, "Failed to load entrata before delete");
            return internal_error();
        }
    };

    match repo.delete(tenant.company_id, id.into_inner()).await {
        Ok(true) => {
            // The row is gone either way; an orphaned object only costs storage.
            if let (Some(key), Some(storage)) = (allegato_key, state.storage.as_ref()) {
                if let Err(e) = storage.delete(&key).await {
                    error!(error = %e, key = %key, "Failed to delete allegato from storage");
                }
            }
            state.list_versions.bump(tenant.company_id, RESOURCE);
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => not_found("Voce non trovata"),
        Err(e) => {
            error!(error = %e, "Failed to delete entrata");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_list_query_parses_pagination_and_filter() {
        let uri: Uri = "/entrate?page=3&per_page=25".parse().unwrap();

        let Query(filter) = Query::<ListQuery>::try_from_uri(&uri).unwrap();
        let Query(page) = Query::<PageRequest>::try_from_uri(&uri).unwrap();

        assert!(filter.commessa_id.is_none());
        assert_eq!(page.page, 3);
        assert_eq!(page.per_page, 25);
    }
}
