//! Work report (rapportino) routes. Read-only surface.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::error;

use crate::{AppState, extractors::TenantContext, response::internal_error};
use miosaas_db::{RapportinoRepository, repositories::RapportinoFilter};
use miosaas_shared::types::{CommessaId, PageRequest, PageResponse};

/// Creates the rapportini router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/rapportini", get(list_rapportini))
}

/// List filter: optional commessa and date range. Pagination params are
/// extracted separately; `serde_urlencoded` cannot deserialize numbers
/// through `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    commessa_id: Option<CommessaId>,
    #[serde(default)]
    from: Option<NaiveDate>,
    #[serde(default)]
    to: Option<NaiveDate>,
}

/// GET /rapportini - List work reports.
async fn list_rapportini(
    State(state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<ListQuery>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let filter = RapportinoFilter {
        commessa_id: query.commessa_id.map(CommessaId::into_inner),
        from: query.from,
        to: query.to,
    };

    let repo = RapportinoRepository::new((*state.db).clone());
    match repo.list(tenant.company_id, &filter, &page).await {
        Ok((rows, total)) => {
            let body = PageResponse::new(rows, page.page, page.per_page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!(error = %e, company_id = %tenant.company_id, "Failed to list rapportini");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_list_query_parses_filters_and_pagination() {
        let uri: Uri = "/rapportini?from=2026-03-01&to=2026-03-31&page=2&per_page=20"
            .parse()
            .unwrap();

        let Query(filter) = Query::<ListQuery>::try_from_uri(&uri).unwrap();
        let Query(page) = Query::<PageRequest>::try_from_uri(&uri).unwrap();

        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(filter.to, NaiveDate::from_ymd_opt(2026, 3, 31));
        assert!(filter.commessa_id.is_none());
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 20);
    }
}
