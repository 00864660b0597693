//! Storage service implementation using Apache OpenDAL.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use opendal::{Operator, services};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Presigned URL for a direct-to-bucket upload.
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL.
    pub url: String,
    /// HTTP method to use (PUT).
    pub method: String,
    /// When the URL expires.
    pub expires_at: DateTime<Utc>,
    /// Required headers for the request.
    pub headers: HashMap<String, String>,
}

/// Request to generate an upload URL.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Tenant the upload belongs to.
    pub company_id: Uuid,
    /// Random id for this upload.
    pub upload_id: Uuid,
    /// Original filename.
    pub filename: String,
    /// Content type (MIME type).
    pub content_type: String,
    /// File size in bytes.
    pub file_size: u64,
}

/// Storage service for invoice/receipt scans.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Creates a storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validates an upload request against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generates the storage key for an upload.
    ///
    /// Format: `companies/{company_id}/uploads/{upload_id}/{sanitized_filename}`
    #[must_use]
    pub fn storage_key(req: &UploadRequest) -> String {
        format!(
            "companies/{}/uploads/{}/{}",
            req.company_id,
            req.upload_id,
            sanitize_filename(&req.filename)
        )
    }

    /// Generates a presigned PUT URL for an upload.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or presigning is not supported.
    pub async fn presign_upload(&self, req: &UploadRequest) -> Result<PresignedUrl, StorageError> {
        self.validate_upload(&req.content_type, req.file_size)?;

        let key = Self::storage_key(req);
        let ttl = Duration::from_secs(self.config.presign_upload_ttl_secs);

        let presigned = self
            .operator
            .presign_write(&key, ttl)
            .await
            .map_err(StorageError::from)?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), req.content_type.clone());

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: Utc::now()
                + chrono::Duration::seconds(
                    i64::try_from(self.config.presign_upload_ttl_secs).unwrap_or(i64::MAX),
                ),
            headers,
        })
    }

    /// Deletes a stored object.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// The storage provider name.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

/// Strips path separators and control characters from a filename.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\') {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> StorageService {
        StorageService::from_config(StorageConfig::new(StorageProvider::local_fs("/tmp/uploads")))
            .unwrap()
    }

    fn request() -> UploadRequest {
        UploadRequest {
            company_id: Uuid::new_v4(),
            upload_id: Uuid::new_v4(),
            filename: "fattura.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            file_size: 1024,
        }
    }

    #[test]
    fn test_storage_key_layout() {
        let req = request();
        let key = StorageService::storage_key(&req);
        assert_eq!(
            key,
            format!(
                "companies/{}/uploads/{}/fattura.pdf",
                req.company_id, req.upload_id
            )
        );
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("scontrino 01.png"), "scontrino 01.png");
    }

    #[test]
    fn test_validate_upload_rejects_oversize() {
        let svc = service();
        let result = svc.validate_upload("application/pdf", 100 * 1024 * 1024);
        assert!(matches!(result, Err(StorageError::FileTooLarge { .. })));
    }

    #[test]
    fn test_validate_upload_rejects_mime() {
        let svc = service();
        let result = svc.validate_upload("text/html", 10);
        assert!(matches!(result, Err(StorageError::InvalidMimeType { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_stored_object() {
        let root = std::env::temp_dir().join(format!("miosaas-store-{}", Uuid::new_v4()));
        let svc = StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(
            root.clone(),
        )))
        .unwrap();

        let key = "companies/demo/uploads/fattura.pdf";
        svc.operator.write(key, b"%PDF-1.4".to_vec()).await.unwrap();

        svc.delete(key).await.unwrap();
        assert!(!svc.operator.exists(key).await.unwrap());

        std::fs::remove_dir_all(root).ok();
    }
}
