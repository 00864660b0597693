//! Commessa repository: per-company jobs.

use chrono::NaiveDate;
use miosaas_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{commesse, sea_orm_active_enums::CommessaStato};

/// Input for creating or updating a commessa.
#[derive(Debug, Clone)]
pub struct CommessaInput {
    /// Job code, unique within the company.
    pub codice: String,
    /// Description.
    pub descrizione: String,
    /// Optional customer the job is for.
    pub cliente_id: Option<Uuid>,
    /// Lifecycle state.
    pub stato: CommessaStato,
    /// Site address.
    pub indirizzo: Option<String>,
    /// Start date.
    pub data_inizio: Option<NaiveDate>,
    /// End date.
    pub data_fine: Option<NaiveDate>,
}

/// Commessa repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CommessaRepository {
    db: DatabaseConnection,
}

impl CommessaRepository {
    /// Creates a new commessa repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists commesse for a company, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<commesse::Model>, u64), DbErr> {
        let query = commesse::Entity::find().filter(commesse::Column::CompanyId.eq(company_id));

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(commesse::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Finds a commessa by ID within a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<commesse::Model>, DbErr> {
        commesse::Entity::find_by_id(id)
            .filter(commesse::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
    }

    /// Creates a commessa.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        company_id: Uuid,
        input: CommessaInput,
    ) -> Result<commesse::Model, DbErr> {
        let now = chrono::Utc::now().into();

        commesse::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            codice: Set(input.codice),
            descrizione: Set(input.descrizione),
            cliente_id: Set(input.cliente_id),
            stato: Set(input.stato),
            indirizzo: Set(input.indirizzo),
            data_inizio: Set(input.data_inizio),
            data_fine: Set(input.data_fine),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Updates a commessa. Returns `None` if not found in the company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: CommessaInput,
    ) -> Result<Option<commesse::Model>, DbErr> {
        let Some(existing) = self.find_by_id(company_id, id).await? else {
            return Ok(None);
        };

        let mut model: commesse::ActiveModel = existing.into();
        model.codice = Set(input.codice);
        model.descrizione = Set(input.descrizione);
        model.cliente_id = Set(input.cliente_id);
        model.stato = Set(input.stato);
        model.indirizzo = Set(input.indirizzo);
        model.data_inizio = Set(input.data_inizio);
        model.data_fine = Set(input.data_fine);
        model.updated_at = Set(chrono::Utc::now().into());

        model.update(&self.db).await.map(Some)
    }
}
