//! `SeaORM` Entity for rapportini (daily work reports).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rapportini")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub commessa_id: Uuid,
    pub operaio: String,
    pub data: Date,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub ore: Decimal,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commesse::Entity",
        from = "Column::CommessaId",
        to = "super::commesse::Column::Id"
    )]
    Commesse,
}

impl Related<super::commesse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commesse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
