//! Fornitore repository: per-company supplier registry.

use miosaas_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::fornitori;

/// Input for creating or updating a fornitore.
#[derive(Debug, Clone, Default)]
pub struct FornitoreInput {
    /// Business name.
    pub denominazione: String,
    /// VAT number.
    pub partita_iva: Option<String>,
    /// Fiscal code.
    pub codice_fiscale: Option<String>,
    /// Address.
    pub indirizzo: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub telefono: Option<String>,
    /// Free-form notes.
    pub note: Option<String>,
}

/// Fornitore repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct FornitoreRepository {
    db: DatabaseConnection,
}

impl FornitoreRepository {
    /// Creates a new fornitore repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists fornitori for a company, ordered by denominazione.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<fornitori::Model>, u64), DbErr> {
        let query = fornitori::Entity::find().filter(fornitori::Column::CompanyId.eq(company_id));

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_asc(fornitori::Column::Denominazione)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds a fornitore by ID within a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<fornitori::Model>, DbErr> {
        fornitori::Entity::find_by_id(id)
            .filter(fornitori::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
    }

    /// Creates a fornitore.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        company_id: Uuid,
        input: FornitoreInput,
    ) -> Result<fornitori::Model, DbErr> {
        let now = chrono::Utc::now().into();

        fornitori::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            denominazione: Set(input.denominazione),
            partita_iva: Set(input.partita_iva),
            codice_fiscale: Set(input.codice_fiscale),
            indirizzo: Set(input.indirizzo),
            email: Set(input.email),
            telefono: Set(input.telefono),
            note: Set(input.note),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Updates a fornitore. Returns `None` if not found in the company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: FornitoreInput,
    ) -> Result<Option<fornitori::Model>, DbErr> {
        let Some(existing) = self.find_by_id(company_id, id).await? else {
            return Ok(None);
        };

        let mut model: fornitori::ActiveModel = existing.into();
        model.denominazione = Set(input.denominazione);
        model.partita_iva = Set(input.partita_iva);
        model.codice_fiscale = Set(input.codice_fiscale);
        model.indirizzo = Set(input.indirizzo);
        model.email = Set(input.email);
        model.telefono = Set(input.telefono);
        model.note = Set(input.note);
        model.updated_at = Set(chrono::Utc::now().into());

        model.update(&self.db).await.map(Some)
    }
}
