//! `SeaORM` Entity for companies table (tenants).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub partita_iva: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_users::Entity")]
    CompanyUsers,
    #[sea_orm(has_many = "super::commesse::Entity")]
    Commesse,
}

impl Related<super::company_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyUsers.def()
    }
}

impl Related<super::commesse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commesse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
