//! Entry submission flow.
//!
//! Drives a draft through `Editing -> Validating -> Submitting` and back:
//! every edit clears that field's error and recomputes the derived VAT
//! fields; submit validates, posts through the gateway, and maps backend
//! rejections onto the same field-error model. A boolean in-flight guard is
//! the only protection against overlapping submissions, mirroring the
//! original UI behavior.

use uuid::Uuid;

use super::gateway::{GatewayError, LedgerGateway};
use super::numeric::parse_flexible_number;
use super::types::{Direction, EntryDraft, EntryProfile, Field};
use super::validate::{FieldErrors, first_invalid, normalize};
use super::vat::{VatRate, compute_from_taxable, compute_from_total};

/// Whether a submission creates a new entry or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// Create a new entry.
    Create,
    /// Update the entry with this id.
    Update(Uuid),
}

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Entry persisted; the form was reset and the owning list should be
    /// refreshed.
    Saved,
    /// Client-side validation failed; focus the given field.
    Invalid {
        /// First offending field in the profile's priority order.
        focus: Option<Field>,
    },
    /// Backend rejected the submission; the draft is preserved.
    Rejected {
        /// Field to focus when the rejection maps onto one.
        focus: Option<Field>,
        /// Transient message to toast when it does not.
        transient: Option<String>,
    },
    /// Token expired or missing; caller should redirect to login.
    Unauthorized,
    /// A submission is already running; this one was refused.
    InFlight,
}

/// Form state for creating or editing a ledger entry.
#[derive(Debug, Clone)]
pub struct EntryForm {
    profile: EntryProfile,
    draft: EntryDraft,
    errors: FieldErrors,
    saving: bool,
}

impl EntryForm {
    /// Creates an empty form for the given commessa and profile.
    #[must_use]
    pub fn new(commessa_id: Uuid, profile: EntryProfile) -> Self {
        Self {
            profile,
            draft: EntryDraft::initial(commessa_id, profile),
            errors: FieldErrors::new(),
            saving: false,
        }
    }

    /// Creates a form prefilled from a stored entry (edit dialog).
    #[must_use]
    pub fn from_draft(profile: EntryProfile, draft: EntryDraft) -> Self {
        let mut form = Self {
            profile,
            draft,
            errors: FieldErrors::new(),
            saving: false,
        };
        form.recompute();
        form
    }

    /// The current draft.
    #[must_use]
    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    /// The current field errors.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    /// The form profile.
    #[must_use]
    pub const fn profile(&self) -> EntryProfile {
        self.profile
    }

    /// Applies a single field edit: stores the raw value, clears that field's
    /// error, recomputes derived VAT fields.
    pub fn set_field(&mut self, field: Field, value: &str) {
        self.errors.remove(&field);

        match field {
            Field::NumeroFattura => self.draft.numero_fattura = value.to_string(),
            Field::Fornitore | Field::Cliente => self.draft.counterparty = value.to_string(),
            Field::Tipologia => self.draft.tipologia = value.to_string(),
            Field::EmissioneFattura => self.draft.emissione_fattura = value.to_string(),
            Field::DataPagamento => self.draft.data_pagamento = value.to_string(),
            Field::ImportoTotale => self.draft.importo_totale = value.to_string(),
            Field::Imponibile => self.draft.imponibile = value.to_string(),
            Field::AliquotaIva => self.draft.aliquota_iva = value.to_string(),
            Field::StatoUscita | Field::StatoEntrata => {
                // Receipts are forced to "Pagato"; the edit is ignored.
                if self.profile.is_invoice() {
                    self.draft.stato = value.to_string();
                }
            }
            Field::MetodoPagamento => self.draft.metodo_pagamento = value.to_string(),
        }

        self.recompute();
    }

    /// Recomputes the derived monetary fields from the driving pair,
    /// clearing them when the inputs do not (yet) parse.
    fn recompute(&mut self) {
        let rate = VatRate::parse(&self.draft.aliquota_iva);

        match self.profile.direction() {
            Direction::Cost => {
                let total = parse_flexible_number(&self.draft.importo_totale);
                match compute_from_total(total, rate) {
                    Some(b) => {
                        self.draft.imponibile = format!("{:.2}", b.imponibile);
                        self.draft.iva = format!("{:.2}", b.iva);
                    }
                    None => {
                        self.draft.imponibile.clear();
                        self.draft.iva.clear();
                    }
                }
            }
            Direction::Revenue => {
                let base = parse_flexible_number(&self.draft.imponibile);
                match compute_from_taxable(base, rate) {
                    Some(b) => {
                        self.draft.iva = format!("{:.2}", b.iva);
                        self.draft.importo_totale = format!("{:.2}", b.importo_totale);
                    }
                    None => {
                        self.draft.iva.clear();
                        self.draft.importo_totale.clear();
                    }
                }
            }
        }
    }

    /// Validates the draft and, when clean, submits it through the gateway.
    ///
    /// The normalized payload is recomputed one final time inside
    /// [`normalize`]; the backend recomputes again on its side.
    pub async fn submit(
        &mut self,
        gateway: &dyn LedgerGateway,
        mode: SubmitMode,
    ) -> SubmitOutcome {
        if self.saving {
            return SubmitOutcome::InFlight;
        }

        let entry = match normalize(&self.draft, self.profile) {
            Ok(entry) => entry,
            Err(errors) => {
                let focus = first_invalid(&errors, self.profile);
                self.errors = errors;
                return SubmitOutcome::Invalid { focus };
            }
        };

        self.saving = true;
        let direction = self.profile.direction();
        let result = match mode {
            SubmitMode::Create => gateway.create_entry(direction, &entry).await,
            SubmitMode::Update(id) => gateway.update_entry(direction, id, &entry).await,
        };
        self.saving = false;

        match result {
            Ok(()) => {
                self.errors.clear();
                self.draft = EntryDraft::initial(self.draft.commessa_id, self.profile);
                SubmitOutcome::Saved
            }
            Err(GatewayError::Conflict { field, message }) => {
                self.errors.insert(field, message);
                SubmitOutcome::Rejected {
                    focus: Some(field),
                    transient: None,
                }
            }
            Err(GatewayError::Validation { fields }) => {
                let focus = first_invalid(&fields, self.profile);
                self.errors.extend(fields);
                SubmitOutcome::Rejected {
                    focus,
                    transient: None,
                }
            }
            Err(GatewayError::Unauthorized) => SubmitOutcome::Unauthorized,
            Err(GatewayError::Network { message }) => SubmitOutcome::Rejected {
                focus: None,
                transient: Some(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::gateway::MockLedgerGateway;
    use mockall::predicate::eq;

    fn filled_cost_invoice_form() -> EntryForm {
        let mut form = EntryForm::new(Uuid::new_v4(), EntryProfile::invoice(Direction::Cost));
        form.set_field(Field::NumeroFattura, "FT-2024/07");
        form.set_field(Field::Fornitore, "Edilizia Rossi");
        form.set_field(Field::Tipologia, "Materiali");
        form.set_field(Field::EmissioneFattura, "2024-05-01");
        form.set_field(Field::DataPagamento, "2024-05-10");
        form.set_field(Field::ImportoTotale, "122,00");
        form.set_field(Field::AliquotaIva, "22");
        form.set_field(Field::StatoUscita, "Pagato");
        form
    }

    #[test]
    fn test_edit_recomputes_derived_fields() {
        let mut form = EntryForm::new(Uuid::new_v4(), EntryProfile::invoice(Direction::Cost));
        form.set_field(Field::ImportoTotale, "122");
        form.set_field(Field::AliquotaIva, "22");

        assert_eq!(form.draft().imponibile, "100.00");
        assert_eq!(form.draft().iva, "22.00");
    }

    #[test]
    fn test_derived_fields_keep_trailing_zeros() {
        let mut form = EntryForm::new(Uuid::new_v4(), EntryProfile::invoice(Direction::Revenue));
        form.set_field(Field::Imponibile, "250");
        form.set_field(Field::AliquotaIva, "10");

        assert_eq!(form.draft().iva, "25.00");
        assert_eq!(form.draft().importo_totale, "275.00");
    }

    #[test]
    fn test_partial_input_clears_derived_fields() {
        let mut form = EntryForm::new(Uuid::new_v4(), EntryProfile::invoice(Direction::Cost));
        form.set_field(Field::ImportoTotale, "122");
        form.set_field(Field::AliquotaIva, "22");
        form.set_field(Field::ImportoTotale, "12x");

        assert_eq!(form.draft().imponibile, "");
        assert_eq!(form.draft().iva, "");
    }

    #[test]
    fn test_edit_clears_existing_field_error() {
        let mut form = EntryForm::new(Uuid::new_v4(), EntryProfile::invoice(Direction::Cost));
        form.errors
            .insert(Field::NumeroFattura, "Campo obbligatorio".into());

        form.set_field(Field::NumeroFattura, "FT-1");
        assert!(!form.errors().contains_key(&Field::NumeroFattura));
    }

    #[test]
    fn test_receipt_status_edit_is_ignored() {
        let mut form = EntryForm::new(Uuid::new_v4(), EntryProfile::receipt());
        form.set_field(Field::StatoUscita, "Non Pagato");
        assert_eq!(form.draft().stato, "Pagato");
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_gateway() {
        let gateway = MockLedgerGateway::new();
        let mut form = EntryForm::new(Uuid::new_v4(), EntryProfile::invoice(Direction::Cost));
        form.set_field(Field::ImportoTotale, "100");
        form.set_field(Field::AliquotaIva, "22");

        let outcome = form.submit(&gateway, SubmitMode::Create).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Invalid {
                focus: Some(Field::NumeroFattura)
            }
        );
        assert!(form.errors().contains_key(&Field::Fornitore));
        assert!(form.errors().contains_key(&Field::StatoUscita));
    }

    #[tokio::test]
    async fn test_successful_submit_resets_form() {
        let mut gateway = MockLedgerGateway::new();
        gateway
            .expect_create_entry()
            .with(eq(Direction::Cost), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut form = filled_cost_invoice_form();
        let outcome = form.submit(&gateway, SubmitMode::Create).await;

        assert_eq!(outcome, SubmitOutcome::Saved);
        assert!(form.draft().numero_fattura.is_empty());
        assert!(form.errors().is_empty());
        assert!(!form.is_saving());
    }

    #[tokio::test]
    async fn test_duplicate_invoice_number_maps_to_field() {
        let mut gateway = MockLedgerGateway::new();
        gateway.expect_create_entry().returning(|_, _| {
            Err(GatewayError::Conflict {
                field: Field::NumeroFattura,
                message: "Numero fattura già esistente".into(),
            })
        });

        let mut form = filled_cost_invoice_form();
        let before = form.draft().clone();
        let outcome = form.submit(&gateway, SubmitMode::Create).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                focus: Some(Field::NumeroFattura),
                transient: None,
            }
        );
        assert_eq!(
            form.errors().get(&Field::NumeroFattura).map(String::as_str),
            Some("Numero fattura già esistente")
        );
        // The draft survives the rejection so the user can correct in place.
        assert_eq!(form.draft(), &before);
    }

    #[tokio::test]
    async fn test_network_error_preserves_draft_with_transient_notice() {
        let mut gateway = MockLedgerGateway::new();
        gateway.expect_create_entry().returning(|_, _| {
            Err(GatewayError::Network {
                message: "connessione rifiutata".into(),
            })
        });

        let mut form = filled_cost_invoice_form();
        let before = form.draft().clone();
        let outcome = form.submit(&gateway, SubmitMode::Create).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                focus: None,
                transient: Some("connessione rifiutata".into()),
            }
        );
        assert!(form.errors().is_empty());
        assert_eq!(form.draft(), &before);
    }

    #[tokio::test]
    async fn test_update_uses_update_endpoint() {
        let id = Uuid::new_v4();
        let mut gateway = MockLedgerGateway::new();
        gateway
            .expect_update_entry()
            .with(
                eq(Direction::Cost),
                eq(id),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut form = filled_cost_invoice_form();
        let outcome = form.submit(&gateway, SubmitMode::Update(id)).await;
        assert_eq!(outcome, SubmitOutcome::Saved);
    }

    #[tokio::test]
    async fn test_unauthorized_bubbles_up() {
        let mut gateway = MockLedgerGateway::new();
        gateway
            .expect_create_entry()
            .returning(|_, _| Err(GatewayError::Unauthorized));

        let mut form = filled_cost_invoice_form();
        let outcome = form.submit(&gateway, SubmitMode::Create).await;
        assert_eq!(outcome, SubmitOutcome::Unauthorized);
    }
}
