//! Error response helpers.
//!
//! Handlers never build error bodies by hand: everything funnels through
//! [`AppError`] so the `{code, message}` contract stays in one place.
//! Validation failures add a `fields` map keyed by wire field name.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use miosaas_core::entry::FieldErrors;
use miosaas_db::repositories::LedgerError;
use miosaas_shared::AppError;

/// Renders an [`AppError`] as the standard `{code, message}` body.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "code": err.error_code(), "message": err.to_string() })),
    )
        .into_response()
}

/// 404 with the standard body.
pub fn not_found(message: &str) -> Response {
    error_response(&AppError::NotFound(message.to_string()))
}

/// 500 with a generic message. Details belong in the log, not the body.
pub fn internal_error() -> Response {
    error_response(&AppError::Internal("An error occurred".to_string()))
}

/// 400 for payload-level validation, with an explicit fields map.
pub fn validation_fields(fields: serde_json::Map<String, serde_json::Value>) -> Response {
    let err = AppError::Validation("Dati non validi".to_string());
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "code": err.error_code(),
            "message": err.to_string(),
            "fields": fields
        })),
    )
        .into_response()
}

/// 400 for domain validation failures, keyed by wire field name.
pub fn validation_error(errors: &FieldErrors) -> Response {
    let fields: serde_json::Map<String, serde_json::Value> = errors
        .iter()
        .map(|(field, message)| (field.wire_name().to_string(), json!(message)))
        .collect();
    validation_fields(fields)
}

/// Maps repository ledger errors onto the wire contract.
pub fn ledger_error(err: &LedgerError) -> Response {
    match err {
        LedgerError::DuplicateInvoiceNumber => error_response(&AppError::DuplicateInvoiceNumber(
            "Numero fattura già registrato".to_string(),
        )),
        LedgerError::NotFound(_) => not_found("Voce non trovata"),
        LedgerError::Database(e) => {
            error!(error = %e, "Ledger database error");
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use miosaas_core::entry::Field;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = not_found("Cliente non trovato");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "Cliente non trovato");
    }

    #[tokio::test]
    async fn test_duplicate_invoice_maps_to_conflict() {
        let response = ledger_error(&LedgerError::DuplicateInvoiceNumber);
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "DUPLICATE_INVOICE_NUMBER");
        assert_eq!(body["message"], "Numero fattura già registrato");
    }

    #[tokio::test]
    async fn test_validation_error_uses_wire_names() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::NumeroFattura, "Campo obbligatorio".to_string());
        let response = validation_error(&errors);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["fields"]["numero_fattura"], "Campo obbligatorio");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = internal_error();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }
}
