//! Request extractors.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, response::error_response};
use miosaas_db::CompanyRepository;
use miosaas_shared::{AppError, Claims, types::CompanyId};

/// Header carrying the active tenant for the request.
pub const COMPANY_HEADER: &str = "x-company-id";

/// Tenant context resolved per request from the `X-Company-ID` header.
///
/// The header value is checked against the authenticated user's
/// memberships, so a valid token for one company cannot read another.
/// Context is always explicit and request-scoped; nothing tenant-related
/// lives in ambient state.
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// Authenticated user.
    pub user_id: Uuid,
    /// Active company for this request.
    pub company_id: Uuid,
    /// User's role in that company.
    pub role: String,
}

fn rejection(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

impl<S> FromRequestParts<S> for TenantContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<Claims>().cloned().ok_or_else(|| {
            error_response(&AppError::Unauthorized("Authentication required".into()))
        })?;

        let header = parts
            .headers
            .get(COMPANY_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                rejection(
                    StatusCode::BAD_REQUEST,
                    "MISSING_COMPANY",
                    "X-Company-ID header is required",
                )
            })?;

        let company_id = header
            .parse::<CompanyId>()
            .map_err(|_| {
                rejection(
                    StatusCode::BAD_REQUEST,
                    "INVALID_COMPANY",
                    "X-Company-ID must be a UUID",
                )
            })?
            .into_inner();

        // Fast path: the token was minted for this company.
        if company_id == claims.company_id() {
            return Ok(Self {
                user_id: claims.user_id(),
                company_id,
                role: claims.role.clone(),
            });
        }

        // Otherwise the user may still be a member of the requested company.
        let state = AppState::from_ref(state);
        let repo = CompanyRepository::new((*state.db).clone());
        let membership = repo
            .find_membership(company_id, claims.user_id())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database error resolving tenant membership");
                error_response(&AppError::Internal("An error occurred".into()))
            })?;

        membership.map_or_else(
            || {
                Err(error_response(&AppError::Forbidden(
                    "Not a member of the requested company".into(),
                )))
            },
            |m| {
                Ok(Self {
                    user_id: claims.user_id(),
                    company_id,
                    role: m.role.as_str().to_string(),
                })
            },
        )
    }
}
