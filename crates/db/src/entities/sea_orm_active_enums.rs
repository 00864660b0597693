//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a user within a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "membership_role")]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Company owner; full control.
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Administrator; manages registries and entries.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Regular member; read and write entries.
    #[sea_orm(string_value = "member")]
    Member,
}

impl MembershipRole {
    /// String form used inside JWT claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

/// Lifecycle state of a commessa (job).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "commessa_stato")]
#[serde(rename_all = "lowercase")]
pub enum CommessaStato {
    /// Work in progress.
    #[sea_orm(string_value = "aperta")]
    Aperta,
    /// Temporarily suspended.
    #[sea_orm(string_value = "sospesa")]
    Sospesa,
    /// Completed and closed.
    #[sea_orm(string_value = "chiusa")]
    Chiusa,
}

/// Source document kind for cost entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "tipo_documento")]
#[serde(rename_all = "lowercase")]
pub enum TipoDocumento {
    /// Invoice, carries a document number and issue date.
    #[sea_orm(string_value = "fattura")]
    Fattura,
    /// Receipt, always already paid.
    #[sea_orm(string_value = "scontrino")]
    Scontrino,
}
