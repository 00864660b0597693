//! HTTP implementation of the ledger gateway.
//!
//! Talks to the REST backend under `/api/tenants`, carrying the auth token
//! and tenant id of an explicit [`TenantSession`] - tenant context is a
//! value passed in, never read from ambient storage.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use async_trait::async_trait;

use super::gateway::{GatewayError, LedgerGateway, classify_backend_error};
use super::types::{Direction, EntryProfile, Field, NormalizedEntry};
use super::validate::FieldErrors;

/// Request-scoped tenant context for backend calls.
#[derive(Debug, Clone)]
pub struct TenantSession {
    /// Backend base URL, e.g. `https://app.example.com`.
    pub base_url: String,
    /// Bearer access token.
    pub access_token: String,
    /// Tenant the calls are scoped to; sent as `X-Company-ID`.
    pub company_id: Uuid,
}

/// Reqwest-backed gateway against the REST surface.
#[derive(Debug, Clone)]
pub struct HttpLedgerGateway {
    client: reqwest::Client,
    session: TenantSession,
}

/// Error body shape of the REST surface: `{code, message}` plus an optional
/// per-field map on validation failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    fields: Option<std::collections::BTreeMap<String, String>>,
}

const fn resource(direction: Direction) -> &'static str {
    match direction {
        Direction::Cost => "uscite",
        Direction::Revenue => "entrate",
    }
}

fn payload(direction: Direction, entry: &NormalizedEntry) -> serde_json::Value {
    let counterparty_key = match direction {
        Direction::Cost => "fornitore",
        Direction::Revenue => "cliente",
    };

    json!({
        "commessa_id": entry.commessa_id,
        "tipo_documento": entry.tipo_documento,
        "numero_fattura": entry.numero_fattura,
        counterparty_key: entry.counterparty,
        "tipologia": entry.tipologia,
        "emissione_fattura": entry.emissione_fattura,
        "data_pagamento": entry.data_pagamento,
        "imponibile": entry.imponibile,
        "iva": entry.iva,
        "importo_totale": entry.importo_totale,
        "aliquota_iva": entry.aliquota_iva,
        "stato": entry.stato,
        "metodo_pagamento": entry.metodo_pagamento,
    })
}

/// Decodes a non-2xx response body into a classified gateway error.
fn decode_error(status: u16, body: &[u8], direction: Direction) -> GatewayError {
    if status == 401 {
        return GatewayError::Unauthorized;
    }

    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();

    if let Some(ErrorBody {
        fields: Some(fields),
        ..
    }) = &parsed
    {
        let mapped: FieldErrors = fields
            .iter()
            .filter_map(|(name, msg)| {
                Field::from_wire_name(name).map(|field| (field, msg.clone()))
            })
            .collect();
        if !mapped.is_empty() {
            return GatewayError::Validation { fields: mapped };
        }
    }

    let (code, message) = match parsed {
        Some(body) => (
            body.code,
            body.message.unwrap_or_else(|| format!("HTTP {status}")),
        ),
        None => (None, format!("HTTP {status}")),
    };

    classify_backend_error(code.as_deref(), &message, EntryProfile::invoice(direction))
}

impl HttpLedgerGateway {
    /// Creates a gateway bound to one tenant session.
    #[must_use]
    pub fn new(session: TenantSession) -> Self {
        Self {
            client: reqwest::Client::new(),
            session,
        }
    }

    async fn send(
        &self,
        method: reqwest::Method,
        url: String,
        direction: Direction,
        entry: &NormalizedEntry,
    ) -> Result<(), GatewayError> {
        let response = self
            .client
            .request(method, url)
            .bearer_auth(&self.session.access_token)
            .header("X-Company-ID", self.session.company_id.to_string())
            .json(&payload(direction, entry))
            .send()
            .await
            .map_err(|e| GatewayError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(decode_error(status.as_u16(), &body, direction))
    }
}

#[async_trait]
impl LedgerGateway for HttpLedgerGateway {
    async fn create_entry(
        &self,
        direction: Direction,
        entry: &NormalizedEntry,
    ) -> Result<(), GatewayError> {
        let url = format!(
            "{}/api/tenants/{}",
            self.session.base_url,
            resource(direction)
        );
        self.send(reqwest::Method::POST, url, direction, entry).await
    }

    async fn update_entry(
        &self,
        direction: Direction,
        id: Uuid,
        entry: &NormalizedEntry,
    ) -> Result<(), GatewayError> {
        let url = format!(
            "{}/api/tenants/{}/{id}",
            self.session.base_url,
            resource(direction)
        );
        self.send(reqwest::Method::PUT, url, direction, entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::types::{DocumentKind, PaymentStatus};
    use crate::entry::vat::VatRate;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry() -> NormalizedEntry {
        NormalizedEntry {
            commessa_id: Uuid::new_v4(),
            tipo_documento: DocumentKind::Fattura,
            numero_fattura: Some("FT-1".into()),
            counterparty: "Edilizia Rossi".into(),
            tipologia: "Materiali".into(),
            emissione_fattura: NaiveDate::from_ymd_opt(2024, 5, 1),
            data_pagamento: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            imponibile: dec!(100.00),
            iva: dec!(22.00),
            importo_totale: dec!(122.00),
            aliquota_iva: VatRate::Standard22,
            stato: PaymentStatus::Pagato,
            metodo_pagamento: Some("Bonifico".into()),
        }
    }

    #[test]
    fn test_payload_uses_direction_specific_counterparty_key() {
        let cost = payload(Direction::Cost, &entry());
        assert_eq!(cost["fornitore"], "Edilizia Rossi");
        assert!(cost.get("cliente").is_none());

        let revenue = payload(Direction::Revenue, &entry());
        assert_eq!(revenue["cliente"], "Edilizia Rossi");
        assert!(revenue.get("fornitore").is_none());
    }

    #[test]
    fn test_payload_serializes_amounts_as_strings() {
        let value = payload(Direction::Cost, &entry());
        assert_eq!(value["importo_totale"], "122.00");
        assert_eq!(value["aliquota_iva"], 22);
        assert_eq!(value["stato"], "Pagato");
        assert_eq!(value["tipo_documento"], "fattura");
    }

    #[test]
    fn test_decode_401() {
        assert!(matches!(
            decode_error(401, b"", Direction::Cost),
            GatewayError::Unauthorized
        ));
    }

    #[test]
    fn test_decode_duplicate_invoice_conflict() {
        let body =
            r#"{"code":"DUPLICATE_INVOICE_NUMBER","message":"Numero fattura già esistente"}"#;
        let err = decode_error(409, body.as_bytes(), Direction::Cost);
        assert!(matches!(
            err,
            GatewayError::Conflict {
                field: Field::NumeroFattura,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_validation_fields() {
        let body = br#"{"code":"VALIDATION_ERROR","message":"Validazione fallita","fields":{"tipologia":"Minimo 3 caratteri"}}"#;
        let err = decode_error(400, body, Direction::Cost);
        match err {
            GatewayError::Validation { fields } => {
                assert_eq!(
                    fields.get(&Field::Tipologia).map(String::as_str),
                    Some("Minimo 3 caratteri")
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_opaque_body_is_transient() {
        let err = decode_error(500, b"<html>boom</html>", Direction::Cost);
        assert!(matches!(err, GatewayError::Network { .. }));
    }
}
