//! Shared type definitions.

pub mod id;
pub mod pagination;

pub use id::{ClienteId, CommessaId, CompanyId, EntrataId, FornitoreId, UscitaId};
pub use pagination::{PageMeta, PageRequest, PageResponse};
