//! Entrata repository: revenue ledger entries.
//!
//! Revenue entries are always invoices, so tipo_documento is not stored.

use miosaas_core::entry::NormalizedEntry;
use miosaas_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::entities::entrate;
use crate::repositories::uscita::{LedgerError, map_insert_err};

/// Base select for a company, optionally narrowed to one commessa.
fn scoped(company_id: Uuid, commessa_id: Option<Uuid>) -> Select<entrate::Entity> {
    let mut query = entrate::Entity::find().filter(entrate::Column::CompanyId.eq(company_id));
    if let Some(commessa_id) = commessa_id {
        query = query.filter(entrate::Column::CommessaId.eq(commessa_id));
    }
    query
}

/// Entrata repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EntrataRepository {
    db: DatabaseConnection,
}

impl EntrataRepository {
    /// Creates a new entrata repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists entrate for a company, newest payment first. An optional
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
    ) -> Result<(Vec<entrate::Model>, u64), DbErr> {
        let query = scoped(company_id, commessa_id);

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(entrate::Column::DataPagamento)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds an entrata by ID within a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<entrate::Model>, DbErr> {
        entrate::Entity::find_by_id(id)
            .filter(entrate::Column::CompanyId.eq(company_id))
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
    ) -> Result<entrate::Model, LedgerError> {
        let now = chrono::Utc::now().into();

        entrate::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            commessa_id: Set(entry.commessa_id),
            numero_fattura: Set(entry.numero_fattura.clone()),
            cliente: Set(entry.counterparty.clone()),
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
    ) -> Result<entrate::Model, LedgerError> {
        let existing = self
            .find_by_id(company_id, id)
            .await?
            .ok_or(LedgerError::NotFound(id))?;

        let mut model: entrate::ActiveModel = existing.into();
        model.commessa_id = Set(entry.commessa_id);
        model.numero_fattura = Set(entry.numero_fattura.clone());
        model.cliente = Set(entry.counterparty.clone());
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

    /// Deletes an entrata. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        let result = entrate::Entity::delete_many()
            .filter(entrate::Column::Id.eq(id))
            .filter(entrate::Column::CompanyId.eq(company_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_list_select_is_company_scoped() {
        let sql = scoped(Uuid::new_v4(), None)
            .build(DbBackend::Postgres)
            .to_string();
        let where_clause = sql.split_once("WHERE").unwrap().1;
        assert!(where_clause.contains("company_id"));
        assert!(!where_clause.contains("commessa_id"));
    }
}
