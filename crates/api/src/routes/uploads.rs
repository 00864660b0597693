//! Presigned upload routes for invoice and receipt scans.
//!
//! The backend never proxies file bytes: the client asks for a presigned
//! PUT URL and uploads straight to the bucket.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, extractors::TenantContext, response::internal_error};
use miosaas_core::storage::{StorageError, StorageService, UploadRequest};

/// Creates the uploads router (requires auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/uploads", post(create_upload))
}

/// Request payload for a presigned upload.
#[derive(Debug, Deserialize)]
pub struct CreateUploadRequest {
    /// Original filename.
    pub filename: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// File size in bytes.
    pub file_size: u64,
}

/// POST /uploads - Generate a presigned PUT URL.
async fn create_upload(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateUploadRequest>,
) -> impl IntoResponse {
    let Some(storage) = state.storage.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "code": "STORAGE_UNAVAILABLE",
                "message": "File storage is not configured"
            })),
        )
            .into_response();
    };

    let request = UploadRequest {
        company_id: tenant.company_id,
        upload_id: Uuid::new_v4(),
        filename: payload.filename,
        content_type: payload.content_type,
        file_size: payload.file_size,
    };

    match storage.presign_upload(&request).await {
        Ok(presigned) => {
            info!(
                company_id = %tenant.company_id,
                upload_id = %request.upload_id,
                "Presigned upload issued"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "upload_url": presigned.url,
                    "method": presigned.method,
                    "expires_at": presigned.expires_at,
                    "headers": presigned.headers,
                    "key": StorageService::storage_key(&request)
                })),
            )
                .into_response()
        }
        Err(e @ (StorageError::FileTooLarge { .. } | StorageError::InvalidMimeType { .. })) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": "INVALID_UPLOAD", "message": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to presign upload");
            internal_error()
        }
    }
}
