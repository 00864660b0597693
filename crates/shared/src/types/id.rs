//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ClienteId` where a
//! `CommessaId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a company (tenant).");
typed_id!(ClienteId, "Unique identifier for a customer registry record.");
typed_id!(FornitoreId, "Unique identifier for a supplier registry record.");
typed_id!(CommessaId, "Unique identifier for a commessa (job).");
typed_id!(EntrataId, "Unique identifier for a revenue ledger entry.");
typed_id!(UscitaId, "Unique identifier for a cost ledger entry.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        let cliente = ClienteId::new();
        let commessa = CommessaId::new();
        assert_ne!(cliente.into_inner(), commessa.into_inner());
    }

    #[test]
    fn test_round_trip_through_string() {
        let id = CompanyId::new();
        let parsed = CompanyId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serde_transparent() {
        let id = UscitaId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.into_inner()));
    }
}
