//! List version tracking for conditional GET.
//!
//! Each (company, resource) pair carries a monotonically increasing
//! version. Every mutation bumps it; list handlers serve the version as
//! an `ETag` and answer `If-None-Match` with 304 when nothing changed.
//! Versions are process-local; a restart simply re-serves full bodies.

use axum::http::{HeaderMap, StatusCode, header};
use dashmap::DashMap;
use uuid::Uuid;

/// Per-(company, resource) version counters.
#[derive(Debug, Default)]
pub struct ListVersions {
    versions: DashMap<(Uuid, &'static str), u64>,
}

impl ListVersions {
    /// Creates an empty version map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version for a company's resource list.
    #[must_use]
    pub fn get(&self, company_id: Uuid, resource: &'static str) -> u64 {
        self.versions
            .get(&(company_id, resource))
            .map_or(0, |v| *v)
    }

    /// Bumps the version after a mutation.
    pub fn bump(&self, company_id: Uuid, resource: &'static str) {
        *self.versions.entry((company_id, resource)).or_insert(0) += 1;
    }

    /// ETag value for the current version.
    #[must_use]
    pub fn etag(&self, company_id: Uuid, resource: &'static str) -> String {
        format!("\"{resource}-v{}\"", self.get(company_id, resource))
    }
}

/// Checks `If-None-Match` against the current ETag.
///
/// Returns `Some(304)` when the client already holds the current version.
#[must_use]
pub fn not_modified(headers: &HeaderMap, etag: &str) -> Option<StatusCode> {
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|h| h.to_str().ok())?;

    if if_none_match == etag {
        Some(StatusCode::NOT_MODIFIED)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_versions_start_at_zero_and_bump() {
        let versions = ListVersions::new();
        let company = Uuid::new_v4();

        assert_eq!(versions.get(company, "clienti"), 0);
        versions.bump(company, "clienti");
        versions.bump(company, "clienti");
        assert_eq!(versions.get(company, "clienti"), 2);
        // Other resources and companies are independent
        assert_eq!(versions.get(company, "fornitori"), 0);
        assert_eq!(versions.get(Uuid::new_v4(), "clienti"), 0);
    }

    #[test]
    fn test_etag_format() {
        let versions = ListVersions::new();
        let company = Uuid::new_v4();
        versions.bump(company, "entrate");
        assert_eq!(versions.etag(company, "entrate"), "\"entrate-v1\"");
    }

    #[test]
    fn test_not_modified_match() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_static("\"clienti-v3\""),
        );

        assert_eq!(
            not_modified(&headers, "\"clienti-v3\""),
            Some(StatusCode::NOT_MODIFIED)
        );
        assert_eq!(not_modified(&headers, "\"clienti-v4\""), None);
    }

    #[test]
    fn test_not_modified_absent_header() {
        let headers = HeaderMap::new();
        assert_eq!(not_modified(&headers, "\"clienti-v0\""), None);
    }
}
