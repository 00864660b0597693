//! `SeaORM` entity definitions.

pub mod clienti;
pub mod commesse;
pub mod companies;
pub mod company_users;
pub mod entrate;
pub mod fornitori;
pub mod rapportini;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod users;
pub mod uscite;
