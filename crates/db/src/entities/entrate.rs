//! `SeaORM` Entity for entrate (revenue ledger entries).
//!
//! Revenue entries are always invoices; amounts are base-driven
//! (imponibile entered, iva and importo_totale derived).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entrate")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub commessa_id: Uuid,
    pub numero_fattura: Option<String>,
    pub cliente: String,
    pub tipologia: String,
    pub emissione_fattura: Option<Date>,
    pub data_pagamento: Date,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub imponibile: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub iva: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub importo_totale: Decimal,
    pub aliquota_iva: i16,
    pub stato: String,
    pub metodo_pagamento: Option<String>,
    pub allegato_key: Option<String>,
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
