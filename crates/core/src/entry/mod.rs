//! VAT-aware ledger entry logic.
//!
//! This module implements the one piece of real domain logic in MioSaaS,
//! shared by cost (uscite) and revenue (entrate) entries:
//! - Tolerant numeric parsing (comma or dot decimal separator)
//! - VAT breakdown calculation, total-driven and base-driven
//! - Field-level validation with a deterministic first-error focus order
//! - The create/edit submission flow against a backend gateway

pub mod flow;
pub mod gateway;
pub mod http_gateway;
pub mod numeric;
pub mod types;
pub mod validate;
pub mod vat;

#[cfg(test)]
mod validate_props;
#[cfg(test)]
mod vat_props;

pub use flow::{EntryForm, SubmitMode, SubmitOutcome};
pub use gateway::{GatewayError, LedgerGateway, classify_backend_error};
pub use http_gateway::{HttpLedgerGateway, TenantSession};
pub use numeric::parse_flexible_number;
pub use types::{
    Direction, DocumentKind, EntryDraft, EntryProfile, Field, NormalizedEntry, PaymentStatus,
};
pub use validate::{FieldErrors, first_invalid, normalize, validate};
pub use vat::{VatBreakdown, VatRate};
