//! `SeaORM` Entity for uscite (cost ledger entries).
//!
//! Cost entries are invoices or receipts; amounts are total-driven
//! (importo_totale entered, imponibile and iva derived).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TipoDocumento;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "uscite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub commessa_id: Uuid,
    pub tipo_documento: TipoDocumento,
    pub numero_fattura: Option<String>,
    pub fornitore: String,
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
