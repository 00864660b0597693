//! Field-level validation and normalization of entry drafts.
//!
//! Validation never fails hard: it produces a map from field to message, and
//! the caller resolves the single "first field to focus" by walking the
//! profile's fixed priority order. Normalization recomputes the derived VAT
//! fields from the driving pair, ignoring whatever derived values the client
//! sent.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use super::numeric::parse_flexible_number;
use super::types::{Direction, EntryDraft, EntryProfile, Field, NormalizedEntry, PaymentStatus};
use super::vat::{VatRate, breakdown_from_taxable, breakdown_from_total};

/// Map from offending field to its (Italian) error message.
pub type FieldErrors = BTreeMap<Field, String>;

const MSG_REQUIRED: &str = "Campo obbligatorio";
const MSG_BAD_FORMAT: &str = "Formato non valido";
const MSG_MIN_LENGTH: &str = "Minimo 3 caratteri";
const MSG_BAD_DATE: &str = "Data non valida";
const MSG_IMPLAUSIBLE_DATE: &str = "Data non plausibile";
const MSG_PAYMENT_BEFORE_ISSUE: &str = "Pagamento prima dell'emissione";
const MSG_BAD_AMOUNT: &str = "Importo non valido";
const MSG_MIN_AMOUNT: &str = "Deve essere ≥ 0,01";
const MSG_BAD_RATE: &str = "Aliquota non valida";
const MSG_BAD_STATUS: &str = "Stato non valido";

/// Earliest plausible document date.
fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest plausible document date: ten years from today.
fn window_end(today: NaiveDate) -> NaiveDate {
    today.checked_add_months(Months::new(120)).unwrap_or(today)
}

fn is_valid_invoice_number(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '/' | '.') || c.is_whitespace())
}

fn parse_date_field(
    raw: &str,
    field: Field,
    today: NaiveDate,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert(field, MSG_REQUIRED.to_string());
        return None;
    }

    let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") else {
        errors.insert(field, MSG_BAD_DATE.to_string());
        return None;
    };

    if date < window_start() || date > window_end(today) {
        errors.insert(field, MSG_IMPLAUSIBLE_DATE.to_string());
        return None;
    }

    Some(date)
}

/// Validates and normalizes a draft against a fixed "today".
///
/// On success the returned entry has its derived monetary fields recomputed
/// from the driving pair (total for cost entries, taxable base for revenue
/// entries); client-sent derived values are discarded.
///
/// # Errors
///
/// Returns the field-error map when any rule fails. The map is the whole
/// result: this function never panics and never short-circuits on the first
/// broken rule.
pub fn normalize_at(
    draft: &EntryDraft,
    profile: EntryProfile,
    today: NaiveDate,
) -> Result<NormalizedEntry, FieldErrors> {
    let mut errors = FieldErrors::new();

    // Invoice number: invoices only; uniqueness is enforced server-side.
    let numero_fattura = if profile.is_invoice() {
        let trimmed = draft.numero_fattura.trim();
        if trimmed.is_empty() {
            errors.insert(Field::NumeroFattura, MSG_REQUIRED.to_string());
            None
        } else if is_valid_invoice_number(trimmed) {
            Some(trimmed.to_string())
        } else {
            errors.insert(Field::NumeroFattura, MSG_BAD_FORMAT.to_string());
            None
        }
    } else {
        None
    };

    let counterparty = draft.counterparty.trim();
    if counterparty.is_empty() {
        errors.insert(profile.counterparty_field(), MSG_REQUIRED.to_string());
    }

    let tipologia = draft.tipologia.trim();
    if tipologia.is_empty() {
        errors.insert(Field::Tipologia, MSG_REQUIRED.to_string());
    } else if tipologia.chars().count() < 3 {
        errors.insert(Field::Tipologia, MSG_MIN_LENGTH.to_string());
    }

    let emissione_fattura = if profile.is_invoice() {
        parse_date_field(
            &draft.emissione_fattura,
            Field::EmissioneFattura,
            today,
            &mut errors,
        )
    } else {
        None
    };

    let data_pagamento = parse_date_field(
        &draft.data_pagamento,
        Field::DataPagamento,
        today,
        &mut errors,
    );

    if let (Some(issued), Some(paid)) = (emissione_fattura, data_pagamento)
        && paid < issued
    {
        errors.insert(Field::DataPagamento, MSG_PAYMENT_BEFORE_ISSUE.to_string());
    }

    let amount_field = profile.amount_field();
    let raw_amount = match profile.direction() {
        Direction::Cost => &draft.importo_totale,
        Direction::Revenue => &draft.imponibile,
    };
    let amount = if raw_amount.trim().is_empty() {
        errors.insert(amount_field, MSG_REQUIRED.to_string());
        None
    } else {
        match parse_flexible_number(raw_amount) {
            None => {
                errors.insert(amount_field, MSG_BAD_AMOUNT.to_string());
                None
            }
            // Minimum chargeable amount is one cent.
            Some(value) if value < Decimal::new(1, 2) => {
                errors.insert(amount_field, MSG_MIN_AMOUNT.to_string());
                None
            }
            Some(value) => Some(value),
        }
    };

    let aliquota_iva = if draft.aliquota_iva.trim().is_empty() {
        errors.insert(Field::AliquotaIva, MSG_REQUIRED.to_string());
        None
    } else {
        let parsed = VatRate::parse(&draft.aliquota_iva);
        if parsed.is_none() {
            errors.insert(Field::AliquotaIva, MSG_BAD_RATE.to_string());
        }
        parsed
    };

    // Receipts are forced to "Pagato" and skip the status rule entirely.
    let stato = if profile.is_invoice() {
        let trimmed = draft.stato.trim();
        if trimmed.is_empty() {
            errors.insert(profile.status_field(), MSG_REQUIRED.to_string());
            None
        } else {
            let parsed = PaymentStatus::parse(trimmed);
            if parsed.is_none() {
                errors.insert(profile.status_field(), MSG_BAD_STATUS.to_string());
            }
            parsed
        }
    } else {
        Some(PaymentStatus::Pagato)
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every None above inserted an error, so these all hold here.
    let (Some(data_pagamento), Some(amount), Some(aliquota_iva), Some(stato)) =
        (data_pagamento, amount, aliquota_iva, stato)
    else {
        return Err(errors);
    };

    let breakdown = match profile.direction() {
        Direction::Cost => breakdown_from_total(amount, aliquota_iva),
        Direction::Revenue => breakdown_from_taxable(amount, aliquota_iva),
    };

    let metodo_pagamento = {
        let trimmed = draft.metodo_pagamento.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    Ok(NormalizedEntry {
        commessa_id: draft.commessa_id,
        tipo_documento: profile.document_kind(),
        numero_fattura,
        counterparty: counterparty.to_string(),
        tipologia: tipologia.to_string(),
        emissione_fattura,
        data_pagamento,
        imponibile: breakdown.imponibile,
        iva: breakdown.iva,
        importo_totale: breakdown.importo_totale,
        aliquota_iva,
        stato,
        metodo_pagamento,
    })
}

/// Validates and normalizes a draft against today's date.
///
/// # Errors
///
/// Returns the field-error map when any rule fails.
pub fn normalize(
    draft: &EntryDraft,
    profile: EntryProfile,
) -> Result<NormalizedEntry, FieldErrors> {
    normalize_at(draft, profile, chrono::Utc::now().date_naive())
}

/// Runs the validation rules only, discarding the normalized entry.
#[must_use]
pub fn validate(draft: &EntryDraft, profile: EntryProfile) -> FieldErrors {
    match normalize(draft, profile) {
        Ok(_) => FieldErrors::new(),
        Err(errors) => errors,
    }
}

/// Resolves the single field to focus/scroll to, walking the profile's fixed
/// priority order.
#[must_use]
pub fn first_invalid(errors: &FieldErrors, profile: EntryProfile) -> Option<Field> {
    profile
        .focus_order()
        .iter()
        .copied()
        .find(|field| errors.contains_key(field))
        .or_else(|| errors.keys().next().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn cost_invoice_draft() -> EntryDraft {
        EntryDraft {
            commessa_id: Uuid::new_v4(),
            numero_fattura: "FT-2024/07".into(),
            counterparty: "Edilizia Rossi".into(),
            tipologia: "Materiali".into(),
            emissione_fattura: "2024-05-01".into(),
            data_pagamento: "2024-05-10".into(),
            importo_totale: "122,00".into(),
            aliquota_iva: "22".into(),
            stato: "Pagato".into(),
            ..EntryDraft::default()
        }
    }

    #[test]
    fn test_valid_cost_invoice_normalizes() {
        let entry = normalize_at(
            &cost_invoice_draft(),
            EntryProfile::invoice(Direction::Cost),
            today(),
        )
        .unwrap();

        assert_eq!(entry.numero_fattura.as_deref(), Some("FT-2024/07"));
        assert_eq!(entry.imponibile, dec!(100.00));
        assert_eq!(entry.iva, dec!(22.00));
        assert_eq!(entry.importo_totale, dec!(122.00));
        assert_eq!(entry.stato, PaymentStatus::Pagato);
    }

    #[test]
    fn test_empty_cost_invoice_flags_all_required_fields() {
        let draft = EntryDraft {
            commessa_id: Uuid::new_v4(),
            importo_totale: "100".into(),
            aliquota_iva: "22".into(),
            ..EntryDraft::default()
        };
        let profile = EntryProfile::invoice(Direction::Cost);
        let errors = match normalize_at(&draft, profile, today()) {
            Err(e) => e,
            Ok(_) => panic!("draft should not validate"),
        };

        for field in [
            Field::NumeroFattura,
            Field::Fornitore,
            Field::Tipologia,
            Field::EmissioneFattura,
            Field::DataPagamento,
            Field::StatoUscita,
        ] {
            assert!(errors.contains_key(&field), "missing error on {field}");
        }
        assert!(!errors.contains_key(&Field::ImportoTotale));
        assert!(!errors.contains_key(&Field::AliquotaIva));
        assert_eq!(first_invalid(&errors, profile), Some(Field::NumeroFattura));
    }

    #[test]
    fn test_receipt_amount_below_minimum() {
        let draft = EntryDraft {
            commessa_id: Uuid::new_v4(),
            counterparty: "Acme".into(),
            tipologia: "Materiali".into(),
            data_pagamento: "2024-01-01".into(),
            importo_totale: "0".into(),
            aliquota_iva: "22".into(),
            stato: "Pagato".into(),
            ..EntryDraft::default()
        };
        let profile = EntryProfile::receipt();
        let errors = validate(&draft, profile);

        assert_eq!(
            errors.get(&Field::ImportoTotale).map(String::as_str),
            Some("Deve essere ≥ 0,01")
        );
        // Receipts force "Pagato": the status rule never fires.
        assert!(!errors.contains_key(&Field::StatoUscita));
        assert_eq!(first_invalid(&errors, profile), Some(Field::ImportoTotale));
    }

    #[test]
    fn test_receipt_ignores_invoice_only_fields() {
        let draft = EntryDraft {
            commessa_id: Uuid::new_v4(),
            counterparty: "Acme".into(),
            tipologia: "Carburante".into(),
            data_pagamento: "2024-01-01".into(),
            importo_totale: "45,90".into(),
            aliquota_iva: "22".into(),
            ..EntryDraft::default()
        };
        let entry = normalize_at(&draft, EntryProfile::receipt(), today()).unwrap();

        assert_eq!(entry.numero_fattura, None);
        assert_eq!(entry.emissione_fattura, None);
        assert_eq!(entry.stato, PaymentStatus::Pagato);
    }

    #[test]
    fn test_payment_before_issue_rejected() {
        let draft = EntryDraft {
            emissione_fattura: "2024-05-10".into(),
            data_pagamento: "2024-05-01".into(),
            ..cost_invoice_draft()
        };
        let errors = validate(&draft, EntryProfile::invoice(Direction::Cost));

        assert_eq!(
            errors.get(&Field::DataPagamento).map(String::as_str),
            Some("Pagamento prima dell'emissione")
        );
    }

    #[test]
    fn test_implausible_dates_rejected() {
        let draft = EntryDraft {
            emissione_fattura: "1999-12-31".into(),
            data_pagamento: "2099-01-01".into(),
            ..cost_invoice_draft()
        };
        let errors = normalize_at(
            &draft,
            EntryProfile::invoice(Direction::Cost),
            today(),
        )
        .unwrap_err();

        assert_eq!(
            errors.get(&Field::EmissioneFattura).map(String::as_str),
            Some("Data non plausibile")
        );
        assert_eq!(
            errors.get(&Field::DataPagamento).map(String::as_str),
            Some("Data non plausibile")
        );
    }

    #[test]
    fn test_invoice_number_character_set() {
        let ok = EntryDraft {
            numero_fattura: "FT 12/2024-B.1".into(),
            ..cost_invoice_draft()
        };
        assert!(validate(&ok, EntryProfile::invoice(Direction::Cost)).is_empty());

        let bad = EntryDraft {
            numero_fattura: "FT#12".into(),
            ..cost_invoice_draft()
        };
        let errors = validate(&bad, EntryProfile::invoice(Direction::Cost));
        assert_eq!(
            errors.get(&Field::NumeroFattura).map(String::as_str),
            Some("Formato non valido")
        );
    }

    #[test]
    fn test_revenue_invoice_is_base_driven() {
        let draft = EntryDraft {
            commessa_id: Uuid::new_v4(),
            numero_fattura: "2024/15".into(),
            counterparty: "Condominio Verdi".into(),
            tipologia: "Acconto lavori".into(),
            emissione_fattura: "2024-03-01".into(),
            data_pagamento: "2024-03-20".into(),
            imponibile: "1000".into(),
            aliquota_iva: "10".into(),
            stato: "Non Pagato".into(),
            ..EntryDraft::default()
        };
        let entry = normalize_at(
            &draft,
            EntryProfile::invoice(Direction::Revenue),
            today(),
        )
        .unwrap();

        assert_eq!(entry.imponibile, dec!(1000.00));
        assert_eq!(entry.iva, dec!(100.00));
        assert_eq!(entry.importo_totale, dec!(1100.00));
        assert_eq!(entry.stato, PaymentStatus::NonPagato);
    }

    #[test]
    fn test_zero_rate_is_a_valid_selection() {
        let draft = EntryDraft {
            aliquota_iva: "0".into(),
            ..cost_invoice_draft()
        };
        let entry = normalize_at(
            &draft,
            EntryProfile::invoice(Direction::Cost),
            today(),
        )
        .unwrap();

        assert_eq!(entry.iva, dec!(0));
        assert_eq!(entry.imponibile, entry.importo_totale);
    }

    #[test]
    fn test_unknown_rate_rejected() {
        let draft = EntryDraft {
            aliquota_iva: "21".into(),
            ..cost_invoice_draft()
        };
        let errors = validate(&draft, EntryProfile::invoice(Direction::Cost));
        assert_eq!(
            errors.get(&Field::AliquotaIva).map(String::as_str),
            Some("Aliquota non valida")
        );
    }

    #[test]
    fn test_short_tipologia_rejected() {
        let draft = EntryDraft {
            tipologia: "ab".into(),
            ..cost_invoice_draft()
        };
        let errors = validate(&draft, EntryProfile::invoice(Direction::Cost));
        assert_eq!(
            errors.get(&Field::Tipologia).map(String::as_str),
            Some("Minimo 3 caratteri")
        );
    }
}
