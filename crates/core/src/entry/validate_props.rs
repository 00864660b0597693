//! Property-based tests for entry validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use uuid::Uuid;

use super::types::{Direction, EntryDraft, EntryProfile, Field};
use super::validate::{first_invalid, normalize_at, validate};

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Strategy for amounts rendered the way users type them, comma or dot.
fn typed_amount() -> impl Strategy<Value = String> {
    (1i64..10_000_000i64, prop::bool::ANY).prop_map(|(cents, use_comma)| {
        let rendered = format!("{}.{:02}", cents / 100, cents % 100);
        if use_comma {
            rendered.replace('.', ",")
        } else {
            rendered
        }
    })
}

fn valid_cost_invoice(amount: String) -> EntryDraft {
    EntryDraft {
        commessa_id: Uuid::nil(),
        numero_fattura: "FT-2024/1".into(),
        counterparty: "Fornitore SRL".into(),
        tipologia: "Materiali".into(),
        emissione_fattura: "2024-01-10".into(),
        data_pagamento: "2024-02-10".into(),
        importo_totale: amount,
        aliquota_iva: "22".into(),
        stato: "Pagato".into(),
        ..EntryDraft::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any amount >= 0.01, however typed, passes the amount rule.
    #[test]
    fn prop_typed_amounts_accepted(amount in typed_amount()) {
        let draft = valid_cost_invoice(amount);
        let errors = validate(&draft, EntryProfile::invoice(Direction::Cost));
        prop_assert!(!errors.contains_key(&Field::ImportoTotale), "errors: {errors:?}");
    }

    /// Validation output is deterministic: same draft, same error map.
    #[test]
    fn prop_validation_deterministic(amount in typed_amount(), drop_number in prop::bool::ANY) {
        let mut draft = valid_cost_invoice(amount);
        if drop_number {
            draft.numero_fattura.clear();
        }
        let profile = EntryProfile::invoice(Direction::Cost);
        let first = validate(&draft, profile);
        let second = validate(&draft, profile);
        prop_assert_eq!(&first, &second);
    }

    /// The focused field is always the earliest broken one in the profile's
    /// priority order.
    #[test]
    fn prop_first_invalid_respects_priority(
        drop_number in prop::bool::ANY,
        drop_counterparty in prop::bool::ANY,
        drop_tipologia in prop::bool::ANY,
    ) {
        let mut draft = valid_cost_invoice("122,00".into());
        if drop_number { draft.numero_fattura.clear(); }
        if drop_counterparty { draft.counterparty.clear(); }
        if drop_tipologia { draft.tipologia.clear(); }

        let profile = EntryProfile::invoice(Direction::Cost);
        let errors = validate(&draft, profile);

        let expected = if drop_number {
            Some(Field::NumeroFattura)
        } else if drop_counterparty {
            Some(Field::Fornitore)
        } else if drop_tipologia {
            Some(Field::Tipologia)
        } else {
            None
        };
        prop_assert_eq!(first_invalid(&errors, profile), expected);
    }

    /// Normalization always restores the VAT identity on accepted drafts.
    #[test]
    fn prop_normalized_entry_holds_vat_identity(amount in typed_amount()) {
        let draft = valid_cost_invoice(amount);
        let entry = normalize_at(&draft, EntryProfile::invoice(Direction::Cost), fixed_today());
        let entry = entry.map_err(|e| TestCaseError::fail(format!("{e:?}")))?;
        prop_assert_eq!(entry.imponibile + entry.iva, entry.importo_totale);
    }
}
