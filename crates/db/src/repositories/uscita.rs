//! Uscita repository: cost ledger entries.

use miosaas_core::entry::{DocumentKind, NormalizedEntry};
use miosaas_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::TipoDocumento, uscite};

/// Error types for ledger entry operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Invoice number already used within the company.
    #[error("Numero fattura già registrato")]
    DuplicateInvoiceNumber,

    /// Entry not found in the company.
    #[error("Entry not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Translates an insert/update failure, using the already-classified SQL
/// error: a unique-constraint violation can only come from the partial
/// index on (company_id, numero_fattura).
fn classify_insert_err(err: DbErr, sql_err: Option<SqlErr>) -> LedgerError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => LedgerError::DuplicateInvoiceNumber,
        _ => LedgerError::Database(err),
    }
}

pub(crate) fn map_insert_err(err: DbErr) -> LedgerError {
    let sql_err = err.sql_err();
    classify_insert_err(err, sql_err)
}

const fn document_kind(kind: DocumentKind) -> TipoDocumento {
    match kind {
        DocumentKind::Fattura => TipoDocumento::Fattura,
        DocumentKind::Scontrino => TipoDocumento::Scontrino,
    }
}

/// Base select for a company, optionally narrowed to one commessa.
fn scoped(company_id: Uuid, commessa_id: Option<Uuid>) -> Select<uscite::Entity> {
    let mut query = uscite::Entity::find().filter(uscite::Column::CompanyId.eq(company_id));
    if let Some(commessa_id) = commessa_id {
        query = query.filter(uscite::Column::CommessaId.eq(commessa_id));
    }
    query
}

/// Builds the insert row for a validated entry.
fn new_row(company_id: Uuid, entry: &NormalizedEntry) -> uscite::ActiveModel {
    let now = chrono::Utc::now().into();

    uscite::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(company_id),
        commessa_id: Set(entry.commessa_id),
        tipo_documento: Set(document_kind(entry.tipo_documento)),
        numero_fattura: Set(entry.numero_fattura.clone()),
        fornitore: Set(entry.counterparty.clone()),
        tipologia: Set(entry.tipologia.clone()),
        emissione_fattura: Set(entry.emissione_fattura),
        data_pagamento: Set(entry.data_pagamento),
        imponibile: Set(entry.imponibile),
        iva: Set(entry.iva),
        importo_totale: Set(entry.importo_totale),
        aliquota_iva: Set(i16::from(entry.aliquota_iva.percent())),
        stato: Set(entry.stato.as_str().to_string()),
        metodo_pagamento: Set(entry.metodo_pagamento.clone()),
        allegato_key: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Uscita repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UscitaRepository {
    db: DatabaseConnection,
}

impl UscitaRepository {
    /// Creates a new uscita repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists uscite for a company, newest payment first. An optional
    /// commessa filter narrows to one job.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        commessa_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<(Vec<uscite::Model>, u64), DbErr> {
        let query = scoped(company_id, commessa_id);

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(uscite::Column::DataPagamento)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds an uscita by ID within a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<uscite::Model>, DbErr> {
        uscite::Entity::find_by_id(id)
            .filter(uscite::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
    }

    /// Inserts a validated entry. The unique index on
    /// (company_id, numero_fattura) backs the duplicate check.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateInvoiceNumber` on an invoice number
    /// collision, or a database error.
    pub async fn create(
        &self,
        company_id: Uuid,
        entry: &NormalizedEntry,
    ) -> Result<uscite::Model, LedgerError> {
        new_row(company_id, entry)
            .insert(&self.db)
            .await
            .map_err(map_insert_err)
    }

    /// Replaces an existing entry with a re-validated one (last write wins).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the entry does not exist in the
    /// company, `LedgerError::DuplicateInvoiceNumber` on a number collision.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        entry: &NormalizedEntry,
    ) -> Result<uscite::Model, LedgerError> {
        let existing = self
            .find_by_id(company_id, id)
            .await?
            .ok_or(LedgerError::NotFound(id))?;

        let mut model: uscite::ActiveModel = existing.into();
        model.commessa_id = Set(entry.commessa_id);
        model.tipo_documento = Set(document_kind(entry.tipo_documento));
        model.numero_fattura = Set(entry.numero_fattura.clone());
        model.fornitore = Set(entry.counterparty.clone());
        model.tipologia = Set(entry.tipologia.clone());
        model.emissione_fattura = Set(entry.emissione_fattura);
        model.data_pagamento = Set(entry.data_pagamento);
        model.imponibile = Set(entry.imponibile);
        model.iva = Set(entry.iva);
        model.importo_totale = Set(entry.importo_totale);
        model.aliquota_iva = Set(i16::from(entry.aliquota_iva.percent()));
        model.stato = Set(entry.stato.as_str().to_string());
        model.metodo_pagamento = Set(entry.metodo_pagamento.clone());
        model.updated_at = Set(chrono::Utc::now().into());

        model.update(&self.db).await.map_err(map_insert_err)
    }

    /// Deletes an uscita. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        let result = uscite::Entity::delete_many()
            .filter(uscite::Column::Id.eq(id))
            .filter(uscite::Column::CompanyId.eq(company_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use miosaas_core::entry::{PaymentStatus, VatRate};
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use sea_orm::{DbBackend, QueryTrait};

    fn entry() -> NormalizedEntry {
        NormalizedEntry {
            commessa_id: Uuid::new_v4(),
            tipo_documento: DocumentKind::Fattura,
            numero_fattura: Some("FT-2024/07".into()),
            counterparty: "Ferramenta Bianchi".into(),
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
    fn test_unique_violation_maps_to_duplicate_invoice_number() {
        let sql_err = Some(SqlErr::UniqueConstraintViolation(
            "duplicate key value violates unique constraint \"uq_uscite_company_numero_fattura\""
                .into(),
        ));

        let err = classify_insert_err(DbErr::Custom("insert failed".into()), sql_err);

        assert!(matches!(err, LedgerError::DuplicateInvoiceNumber));
        assert_eq!(err.to_string(), "Numero fattura già registrato");
    }

    #[test]
    fn test_other_errors_stay_database_errors() {
        let fk = Some(SqlErr::ForeignKeyConstraintViolation(
            "fk_uscite_commessa".into(),
        ));
        let err = classify_insert_err(DbErr::Custom("insert failed".into()), fk);
        assert!(matches!(err, LedgerError::Database(_)));

        let err = classify_insert_err(DbErr::Custom("connection reset".into()), None);
        assert!(matches!(err, LedgerError::Database(_)));
    }

    #[rstest]
    #[case(DocumentKind::Fattura, TipoDocumento::Fattura)]
    #[case(DocumentKind::Scontrino, TipoDocumento::Scontrino)]
    fn test_document_kind_mapping(#[case] kind: DocumentKind, #[case] expected: TipoDocumento) {
        assert_eq!(document_kind(kind), expected);
    }

    #[test]
    fn test_new_row_carries_normalized_values() {
        let company_id = Uuid::new_v4();
        let row = new_row(company_id, &entry());

        assert_eq!(row.company_id.unwrap(), company_id);
        assert_eq!(row.tipo_documento.unwrap(), TipoDocumento::Fattura);
        assert_eq!(row.imponibile.unwrap(), dec!(100.00));
        assert_eq!(row.iva.unwrap(), dec!(22.00));
        assert_eq!(row.importo_totale.unwrap(), dec!(122.00));
        assert_eq!(row.aliquota_iva.unwrap(), 22);
        assert_eq!(row.stato.unwrap(), "Pagato");
        assert_eq!(row.allegato_key.unwrap(), None);
    }

    #[test]
    fn test_list_select_is_company_scoped() {
        let company_id = Uuid::new_v4();
        let commessa_id = Uuid::new_v4();

        let sql = scoped(company_id, Some(commessa_id))
            .build(DbBackend::Postgres)
            .to_string();
        let where_clause = sql.split_once("WHERE").unwrap().1;
        assert!(where_clause.contains("company_id"));
        assert!(where_clause.contains("commessa_id"));

        let sql = scoped(company_id, None).build(DbBackend::Postgres).to_string();
        let where_clause = sql.split_once("WHERE").unwrap().1;
        assert!(where_clause.contains("company_id"));
        assert!(!where_clause.contains("commessa_id"));
    }
}
