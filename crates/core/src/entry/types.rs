//! Domain types for ledger entries.
//!
//! A ledger entry belongs to a commessa (job) and is either a cost (uscita)
//! or a revenue (entrata). Cost entries can be invoices or receipts
//! (scontrini); revenue entries are always invoices. Receipts have no invoice
//! number, no issue date, and are always marked paid.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vat::VatRate;

/// Entry direction: money out (cost) or money in (revenue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Uscita - supplier invoice or receipt.
    Cost,
    /// Entrata - customer invoice.
    Revenue,
}

/// Document type of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Fattura - full invoice with number, issue date and payment status.
    Fattura,
    /// Scontrino - simplified receipt, cost entries only, always paid.
    Scontrino,
}

/// Payment status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Paid.
    #[serde(rename = "Pagato")]
    Pagato,
    /// Not paid yet.
    #[serde(rename = "Non Pagato")]
    NonPagato,
}

impl PaymentStatus {
    /// Parses the wire/display form ("Pagato" / "Non Pagato").
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "Pagato" => Some(Self::Pagato),
            "Non Pagato" | "Non pagato" => Some(Self::NonPagato),
            _ => None,
        }
    }

    /// Returns the display form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pagato => "Pagato",
            Self::NonPagato => "Non Pagato",
        }
    }
}

/// Form fields of a ledger entry, named as they travel on the wire.
///
/// The counterparty, amount and status fields differ per direction
/// (fornitore/cliente, importo_totale/imponibile, stato_uscita/stato_entrata);
/// [`EntryProfile`] picks the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Invoice number.
    NumeroFattura,
    /// Supplier name (cost entries).
    Fornitore,
    /// Customer name (revenue entries).
    Cliente,
    /// Entry category.
    Tipologia,
    /// Invoice issue date.
    EmissioneFattura,
    /// Payment date.
    DataPagamento,
    /// Total amount (user-entered on cost entries).
    ImportoTotale,
    /// Taxable base (user-entered on revenue entries).
    Imponibile,
    /// VAT rate.
    AliquotaIva,
    /// Payment status of a cost entry.
    StatoUscita,
    /// Payment status of a revenue entry.
    StatoEntrata,
    /// Payment method.
    MetodoPagamento,
}

impl Field {
    /// Returns the wire name of the field.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::NumeroFattura => "numero_fattura",
            Self::Fornitore => "fornitore",
            Self::Cliente => "cliente",
            Self::Tipologia => "tipologia",
            Self::EmissioneFattura => "emissione_fattura",
            Self::DataPagamento => "data_pagamento",
            Self::ImportoTotale => "importo_totale",
            Self::Imponibile => "imponibile",
            Self::AliquotaIva => "aliquota_iva",
            Self::StatoUscita => "stato_uscita",
            Self::StatoEntrata => "stato_entrata",
            Self::MetodoPagamento => "metodo_pagamento",
        }
    }

    /// Parses a wire name back into a field.
    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        [
            Self::NumeroFattura,
            Self::Fornitore,
            Self::Cliente,
            Self::Tipologia,
            Self::EmissioneFattura,
            Self::DataPagamento,
            Self::ImportoTotale,
            Self::Imponibile,
            Self::AliquotaIva,
            Self::StatoUscita,
            Self::StatoEntrata,
            Self::MetodoPagamento,
        ]
        .into_iter()
        .find(|f| f.wire_name() == name)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Validation/computation profile of an entry form.
///
/// Receipts exist only for cost entries, so the only constructors are
/// [`EntryProfile::invoice`] and [`EntryProfile::receipt`] - a revenue
/// receipt is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryProfile {
    direction: Direction,
    document_kind: DocumentKind,
}

impl EntryProfile {
    /// Invoice profile for the given direction.
    #[must_use]
    pub const fn invoice(direction: Direction) -> Self {
        Self {
            direction,
            document_kind: DocumentKind::Fattura,
        }
    }

    /// Receipt profile (always a cost entry).
    #[must_use]
    pub const fn receipt() -> Self {
        Self {
            direction: Direction::Cost,
            document_kind: DocumentKind::Scontrino,
        }
    }

    /// The entry direction.
    #[must_use]
    pub const fn direction(self) -> Direction {
        self.direction
    }

    /// The document kind.
    #[must_use]
    pub const fn document_kind(self) -> DocumentKind {
        self.document_kind
    }

    /// Whether this profile is an invoice (vs. receipt).
    #[must_use]
    pub const fn is_invoice(self) -> bool {
        matches!(self.document_kind, DocumentKind::Fattura)
    }

    /// The counterparty field for this direction.
    #[must_use]
    pub const fn counterparty_field(self) -> Field {
        match self.direction {
            Direction::Cost => Field::Fornitore,
            Direction::Revenue => Field::Cliente,
        }
    }

    /// The user-entered amount field for this direction.
    ///
    /// Cost entries are total-driven, revenue entries base-driven.
    #[must_use]
    pub const fn amount_field(self) -> Field {
        match self.direction {
            Direction::Cost => Field::ImportoTotale,
            Direction::Revenue => Field::Imponibile,
        }
    }

    /// The status field for this direction.
    #[must_use]
    pub const fn status_field(self) -> Field {
        match self.direction {
            Direction::Cost => Field::StatoUscita,
            Direction::Revenue => Field::StatoEntrata,
        }
    }

    /// Fixed priority order used to pick the first invalid field to focus.
    #[must_use]
    pub const fn focus_order(self) -> &'static [Field] {
        match (self.direction, self.document_kind) {
            (Direction::Cost, DocumentKind::Fattura) => &[
                Field::NumeroFattura,
                Field::Fornitore,
                Field::Tipologia,
                Field::EmissioneFattura,
                Field::DataPagamento,
                Field::ImportoTotale,
                Field::AliquotaIva,
                Field::StatoUscita,
            ],
            (Direction::Revenue, _) => &[
                Field::NumeroFattura,
                Field::Cliente,
                Field::Tipologia,
                Field::EmissioneFattura,
                Field::DataPagamento,
                Field::Imponibile,
                Field::AliquotaIva,
                Field::StatoEntrata,
            ],
            (Direction::Cost, DocumentKind::Scontrino) => &[
                Field::Fornitore,
                Field::Tipologia,
                Field::DataPagamento,
                Field::ImportoTotale,
            ],
        }
    }
}

/// Raw form state: every field exactly as the user typed it.
///
/// Amounts and dates stay strings here; parsing happens on recompute and
/// validation so half-typed input never corrupts derived state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    /// Owning commessa - supplied by the page context, never user-edited.
    pub commessa_id: Uuid,
    /// Invoice number.
    pub numero_fattura: String,
    /// Counterparty name (supplier or customer per direction).
    pub counterparty: String,
    /// Category.
    pub tipologia: String,
    /// Issue date, `YYYY-MM-DD`.
    pub emissione_fattura: String,
    /// Payment date, `YYYY-MM-DD`.
    pub data_pagamento: String,
    /// Total amount as entered (cost entries).
    pub importo_totale: String,
    /// Taxable base as entered (revenue entries).
    pub imponibile: String,
    /// Derived tax amount, kept as display text.
    pub iva: String,
    /// VAT rate as entered.
    pub aliquota_iva: String,
    /// Payment status display value.
    pub stato: String,
    /// Payment method, free text.
    pub metodo_pagamento: String,
}

impl EntryDraft {
    /// Initial (empty) draft for a profile.
    ///
    /// Receipts come pre-set to "Pagato"; that field is forced, not edited.
    #[must_use]
    pub fn initial(commessa_id: Uuid, profile: EntryProfile) -> Self {
        let stato = if profile.is_invoice() {
            String::new()
        } else {
            PaymentStatus::Pagato.as_str().to_string()
        };

        Self {
            commessa_id,
            stato,
            ..Self::default()
        }
    }
}

/// A fully parsed, validated and recomputed entry, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    /// Owning commessa.
    pub commessa_id: Uuid,
    /// Document kind.
    pub tipo_documento: DocumentKind,
    /// Invoice number; `None` for receipts.
    pub numero_fattura: Option<String>,
    /// Counterparty name.
    pub counterparty: String,
    /// Category.
    pub tipologia: String,
    /// Issue date; `None` for receipts.
    pub emissione_fattura: Option<NaiveDate>,
    /// Payment date.
    pub data_pagamento: NaiveDate,
    /// Taxable base, 2 decimals.
    pub imponibile: Decimal,
    /// Tax amount, 2 decimals.
    pub iva: Decimal,
    /// Total, 2 decimals.
    pub importo_totale: Decimal,
    /// VAT rate.
    pub aliquota_iva: VatRate,
    /// Payment status; receipts are always `Pagato`.
    pub stato: PaymentStatus,
    /// Payment method.
    pub metodo_pagamento: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_profile_is_cost() {
        let p = EntryProfile::receipt();
        assert_eq!(p.direction(), Direction::Cost);
        assert_eq!(p.document_kind(), DocumentKind::Scontrino);
        assert!(!p.is_invoice());
    }

    #[test]
    fn test_profile_field_selection() {
        let cost = EntryProfile::invoice(Direction::Cost);
        assert_eq!(cost.counterparty_field(), Field::Fornitore);
        assert_eq!(cost.amount_field(), Field::ImportoTotale);
        assert_eq!(cost.status_field(), Field::StatoUscita);

        let revenue = EntryProfile::invoice(Direction::Revenue);
        assert_eq!(revenue.counterparty_field(), Field::Cliente);
        assert_eq!(revenue.amount_field(), Field::Imponibile);
        assert_eq!(revenue.status_field(), Field::StatoEntrata);
    }

    #[test]
    fn test_focus_order_starts_with_invoice_number_for_invoices() {
        assert_eq!(
            EntryProfile::invoice(Direction::Cost).focus_order()[0],
            Field::NumeroFattura
        );
        assert_eq!(
            EntryProfile::invoice(Direction::Revenue).focus_order()[0],
            Field::NumeroFattura
        );
        assert_eq!(EntryProfile::receipt().focus_order()[0], Field::Fornitore);
    }

    #[test]
    fn test_initial_draft_receipt_forced_paid() {
        let draft = EntryDraft::initial(Uuid::new_v4(), EntryProfile::receipt());
        assert_eq!(draft.stato, "Pagato");

        let draft = EntryDraft::initial(Uuid::new_v4(), EntryProfile::invoice(Direction::Cost));
        assert!(draft.stato.is_empty());
    }

    #[test]
    fn test_field_wire_name_round_trip() {
        for field in [
            Field::NumeroFattura,
            Field::Fornitore,
            Field::Cliente,
            Field::Tipologia,
            Field::EmissioneFattura,
            Field::DataPagamento,
            Field::ImportoTotale,
            Field::Imponibile,
            Field::AliquotaIva,
            Field::StatoUscita,
            Field::StatoEntrata,
            Field::MetodoPagamento,
        ] {
            assert_eq!(Field::from_wire_name(field.wire_name()), Some(field));
        }
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!(PaymentStatus::parse("Pagato"), Some(PaymentStatus::Pagato));
        assert_eq!(
            PaymentStatus::parse("Non Pagato"),
            Some(PaymentStatus::NonPagato)
        );
        assert_eq!(PaymentStatus::parse("boh"), None);
    }
}
