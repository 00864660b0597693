//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query on tenant-owned data is scoped by `company_id`.

pub mod cliente;
pub mod commessa;
pub mod company;
pub mod entrata;
pub mod fornitore;
pub mod rapportino;
pub mod session;
pub mod user;
pub mod uscita;

pub use cliente::{ClienteInput, ClienteRepository};
pub use commessa::{CommessaInput, CommessaRepository};
pub use company::CompanyRepository;
pub use entrata::EntrataRepository;
pub use fornitore::{FornitoreInput, FornitoreRepository};
pub use rapportino::{RapportinoFilter, RapportinoRepository};
pub use session::SessionRepository;
pub use user::UserRepository;
pub use uscita::{LedgerError, UscitaRepository};
