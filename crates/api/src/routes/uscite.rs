//! Cost ledger entry routes.
//!
//! Handlers re-run the domain validator and recompute derived VAT fields
//! server-side; any client-sent derived values are ignored.

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
use miosaas_db::UscitaRepository;
use miosaas_shared::types::{CommessaId, PageRequest, PageResponse, UscitaId};

const RESOURCE: &str = "uscite";

/// Creates the uscite router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/uscite", get(list_uscite).post(create_uscita))
        .route(
            "/uscite/{id}",
            axum::routing::put(update_uscita).delete(delete_uscita),
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
///
/// Derived amounts (imponibile, iva for cost entries) are deliberately
/// not accepted; the server recomputes them from the driving pair.
#[derive(Debug, Deserialize)]
pub struct UscitaPayload {
    /// Owning commessa.
    pub commessa_id: CommessaId,
    /// `fattura` or `scontrino`; defaults to fattura.
    #[serde(default)]
    pub tipo_documento: Option<String>,
    /// Invoice number.
    #[serde(default)]
    pub numero_fattura: String,
    /// Supplier name.
    #[serde(default)]
    pub fornitore: String,
    /// Category.
    #[serde(default)]
    pub tipologia: String,
    /// Issue date, `YYYY-MM-DD`.
    #[serde(default)]
    pub emissione_fattura: String,
    /// Payment date, `YYYY-MM-DD`.
    #[serde(default)]
    pub data_pagamento: String,
    /// Total amount as entered.
    #[serde(default)]
    pub importo_totale: String,
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

impl UscitaPayload {
    fn profile(&self) -> EntryProfile {
        match self.tipo_documento.as_deref() {
            Some("scontrino") => EntryProfile::receipt(),
            _ => EntryProfile::invoice(Direction::Cost),
        }
    }

    fn draft(&self) -> EntryDraft {
        EntryDraft {
            commessa_id: self.commessa_id.into_inner(),
            numero_fattura: self.numero_fattura.clone(),
            counterparty: self.fornitore.clone(),
            tipologia: self.tipologia.clone(),
            emissione_fattura: self.emissione_fattura.clone(),
            data_pagamento: self.data_pagamento.clone(),
            importo_totale: self.importo_totale.clone(),
            imponibile: String::new(),
            iva: String::new(),
            aliquota_iva: self.aliquota_iva.clone(),
            stato: self.stato.clone(),
            metodo_pagamento: self.metodo_pagamento.clone(),
        }
    }
}

/// GET /uscite - List cost entries, with conditional GET via ETag.
async fn list_uscite(
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

    let repo = UscitaRepository::new((*state.db).clone());
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
            error!(error = %e, company_id = %tenant.company_id, "Failed to list uscite");
            internal_error()
        }
    }
}

/// POST /uscite - Create a cost entry.
async fn create_uscita(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<UscitaPayload>,
) -> impl IntoResponse {
    let entry = match normalize(&payload.draft(), payload.profile()) {
        Ok(entry) => entry,
        Err(errors) => return validation_error(&errors),
    };

    let repo = UscitaRepository::new((*state.db).clone());
    match repo.create(tenant.company_id, &entry).await {
        Ok(uscita) => {
            info!(uscita_id = %uscita.id, commessa_id = %uscita.commessa_id, "Uscita created");
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::CREATED, Json(uscita)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// PUT /uscite/{id} - Replace a cost entry (last write wins).
async fn update_uscita(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<UscitaId>,
    Json(payload): Json<UscitaPayload>,
) -> impl IntoResponse {
    let entry = match normalize(&payload.draft(), payload.profile()) {
        Ok(entry) => entry,
        Err(errors) => return validation_error(&errors),
    };

    let repo = UscitaRepository::new((*state.db).clone());
    match repo.update(tenant.company_id, id.into_inner(), &entry).await {
        Ok(uscita) => {
            state.list_versions.bump(tenant.company_id, RESOURCE);
            (StatusCode::OK, Json(uscita)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// DELETE /uscite/{id} - Delete a cost entry and its stored attachment.
async fn delete_uscita(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<UscitaId>,
) -> impl IntoResponse {
    let repo = UscitaRepository::new((*state.db).clone());

    let allegato_key = match repo.find_by_id(tenant.company_id, id.into_inner()).await {
        Ok(Some(row)) => row.allegato_key,
        Ok(None) => return not_found("Voce non trovata"),
        Err(e) => {
            error!(error = %e, "Failed to load uscita before delete");
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
            error!(error = %e, "Failed to delete uscita");
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
        let uri: Uri =
            "/uscite?page=2&per_page=10&commessa_id=00000000-0000-0000-0000-000000000003"
                .parse()
                .unwrap();

        let Query(filter) = Query::<ListQuery>::try_from_uri(&uri).unwrap();
        let Query(page) = Query::<PageRequest>::try_from_uri(&uri).unwrap();

        assert!(filter.commessa_id.is_some());
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 10);
    }

    #[test]
    fn test_list_query_defaults_without_params() {
        let uri: Uri = "/uscite".parse().unwrap();

        let Query(filter) = Query::<ListQuery>::try_from_uri(&uri).unwrap();
        let Query(page) = Query::<PageRequest>::try_from_uri(&uri).unwrap();

        assert!(filter.commessa_id.is_none());
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 50);
    }
}
