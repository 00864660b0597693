//! Company repository: tenants and memberships.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{companies, company_users, sea_orm_active_enums::MembershipRole};

/// Company repository for tenant and membership operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        name: &str,
        slug: &str,
        partita_iva: Option<&str>,
    ) -> Result<companies::Model, DbErr> {
        let now = chrono::Utc::now().into();

        companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            partita_iva: Set(partita_iva.map(String::from)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Adds a user to a company with the given role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_member(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> Result<company_users::Model, DbErr> {
        company_users::ActiveModel {
            company_id: Set(company_id),
            user_id: Set(user_id),
            role: Set(role),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a user's membership in a company.
    ///
    /// Used by the tenant extractor to validate the `X-Company-ID` header
    /// against the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_membership(
        &self,
        company_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<company_users::Model>, DbErr> {
        company_users::Entity::find_by_id((company_id, user_id))
            .one(&self.db)
            .await
    }

    /// Lists all companies a user belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<companies::Model>, DbErr> {
        let memberships = company_users::Entity::find()
            .filter(company_users::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = memberships.iter().map(|m| m.company_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        companies::Entity::find()
            .filter(companies::Column::Id.is_in(ids))
            .filter(companies::Column::IsActive.eq(true))
            .all(&self.db)
            .await
    }
}
