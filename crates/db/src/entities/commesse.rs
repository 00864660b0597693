//! `SeaORM` Entity for commesse (jobs / work orders).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CommessaStato;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "commesse")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub codice: String,
    pub descrizione: String,
    pub cliente_id: Option<Uuid>,
    pub stato: CommessaStato,
    pub indirizzo: Option<String>,
    pub data_inizio: Option<Date>,
    pub data_fine: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::clienti::Entity",
        from = "Column::ClienteId",
        to = "super::clienti::Column::Id"
    )]
    Clienti,
    #[sea_orm(has_many = "super::entrate::Entity")]
    Entrate,
    #[sea_orm(has_many = "super::uscite::Entity")]
    Uscite,
    #[sea_orm(has_many = "super::rapportini::Entity")]
    Rapportini,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::clienti::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clienti.def()
    }
}

impl Related<super::entrate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entrate.def()
    }
}

impl Related<super::uscite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uscite.def()
    }
}

impl Related<super::rapportini::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rapportini.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
