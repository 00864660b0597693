//! Backend gateway abstraction for entry submission.
//!
//! The submission flow talks to the REST backend through this trait so the
//! flow itself stays transport-free and testable with a mock.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::types::{Direction, EntryProfile, Field, NormalizedEntry};
use super::validate::FieldErrors;

/// Errors coming back from the backend, already classified.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Server-detected conflict attributable to one field (the duplicate
    /// invoice number case).
    #[error("{message}")]
    Conflict {
        /// The field to attach the message to.
        field: Field,
        /// Human-readable message from the server.
        message: String,
    },

    /// Server-side validation rejected one or more fields.
    #[error("validation rejected by server")]
    Validation {
        /// Field-error map as decoded from the response body.
        fields: FieldErrors,
    },

    /// Token missing/expired; the caller should re-authenticate.
    #[error("unauthorized")]
    Unauthorized,

    /// Network failure or unclassifiable server error; the draft must be
    /// preserved so the user can retry.
    #[error("{message}")]
    Network {
        /// What went wrong.
        message: String,
    },
}

/// Persistence surface the submission flow drives.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Creates a new entry for its commessa.
    async fn create_entry(
        &self,
        direction: Direction,
        entry: &NormalizedEntry,
    ) -> Result<(), GatewayError>;

    /// Updates an existing entry.
    async fn update_entry(
        &self,
        direction: Direction,
        id: Uuid,
        entry: &NormalizedEntry,
    ) -> Result<(), GatewayError>;
}

/// Classifies a raw backend error into a `GatewayError`.
///
/// Order matters: the structured `code` wins; the substring heuristics on the
/// free-text message are a legacy fallback for backends that predate the
/// error-code contract; everything else is a transient error.
#[must_use]
pub fn classify_backend_error(
    code: Option<&str>,
    message: &str,
    profile: EntryProfile,
) -> GatewayError {
    if code == Some("DUPLICATE_INVOICE_NUMBER") {
        return GatewayError::Conflict {
            field: Field::NumeroFattura,
            message: message.to_string(),
        };
    }

    let lowered = message.to_lowercase();
    if ["fattura", "numero", "duplicat"]
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        return GatewayError::Conflict {
            field: Field::NumeroFattura,
            message: message.to_string(),
        };
    }
    if ["fornitore", "cliente"]
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        return GatewayError::Conflict {
            field: profile.counterparty_field(),
            message: message.to_string(),
        };
    }

    GatewayError::Network {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_code_wins() {
        let err = classify_backend_error(
            Some("DUPLICATE_INVOICE_NUMBER"),
            "Numero fattura già esistente",
            EntryProfile::invoice(Direction::Cost),
        );
        assert!(matches!(
            err,
            GatewayError::Conflict {
                field: Field::NumeroFattura,
                ..
            }
        ));
    }

    #[test]
    fn test_message_heuristic_invoice_number() {
        let err = classify_backend_error(
            None,
            "fattura duplicata",
            EntryProfile::invoice(Direction::Cost),
        );
        assert!(matches!(
            err,
            GatewayError::Conflict {
                field: Field::NumeroFattura,
                ..
            }
        ));
    }

    #[test]
    fn test_message_heuristic_counterparty_follows_direction() {
        let cost = classify_backend_error(
            None,
            "fornitore sconosciuto",
            EntryProfile::invoice(Direction::Cost),
        );
        assert!(matches!(
            cost,
            GatewayError::Conflict {
                field: Field::Fornitore,
                ..
            }
        ));

        let revenue = classify_backend_error(
            None,
            "cliente sconosciuto",
            EntryProfile::invoice(Direction::Revenue),
        );
        assert!(matches!(
            revenue,
            GatewayError::Conflict {
                field: Field::Cliente,
                ..
            }
        ));
    }

    #[test]
    fn test_unclassified_message_is_transient() {
        let err = classify_backend_error(
            Some("INTERNAL_ERROR"),
            "errore interno",
            EntryProfile::receipt(),
        );
        assert!(matches!(err, GatewayError::Network { .. }));
    }
}
