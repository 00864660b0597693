//! Rapportino repository: read-only work report listing.

use chrono::NaiveDate;
use miosaas_shared::types::PageRequest;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entities::rapportini;

/// Filter options for listing rapportini.
#[derive(Debug, Clone, Default)]
pub struct RapportinoFilter {
    /// Restrict to one commessa.
    pub commessa_id: Option<Uuid>,
    /// Only reports on or after this date.
    pub from: Option<NaiveDate>,
    /// Only reports on or before this date.
    pub to: Option<NaiveDate>,
}

/// Rapportino repository. The API exposes only reads; rows are written
/// by the seeder and future ingestion tooling.
#[derive(Debug, Clone)]
pub struct RapportinoRepository {
    db: DatabaseConnection,
}

impl RapportinoRepository {
    /// Creates a new rapportino repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists rapportini for a company, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        filter: &RapportinoFilter,
        page: &PageRequest,
    ) -> Result<(Vec<rapportini::Model>, u64), DbErr> {
        let mut query =
            rapportini::Entity::find().filter(rapportini::Column::CompanyId.eq(company_id));

        if let Some(commessa_id) = filter.commessa_id {
            query = query.filter(rapportini::Column::CommessaId.eq(commessa_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(rapportini::Column::Data.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(rapportini::Column::Data.lte(to));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(rapportini::Column::Data)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }
}
