//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: AWS S3, Cloudflare R2, DigitalOcean Spaces.
    S3 {
        /// Optional custom endpoint URL.
        endpoint: Option<String>,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Creates an S3-compatible provider.
    #[must_use]
    pub fn s3(
        endpoint: Option<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint,
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Creates a local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Provider name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Presigned upload URL TTL in seconds.
    pub presign_upload_ttl_secs: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
    /// Default upload TTL: 10 minutes.
    pub const DEFAULT_UPLOAD_TTL: u64 = 600;

    /// Creates a storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            presign_upload_ttl_secs: Self::DEFAULT_UPLOAD_TTL,
            allowed_mime_types: Self::default_mime_types(),
        }
    }

    /// Sets the presigned upload URL TTL.
    #[must_use]
    pub const fn with_upload_ttl(mut self, secs: u64) -> Self {
        self.presign_upload_ttl_secs = secs;
        self
    }

    /// Default allowed MIME types: documents and scans.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        vec![
            "application/pdf".to_string(),
            "image/png".to_string(),
            "image/jpeg".to_string(),
            "image/webp".to_string(),
        ]
    }

    /// Checks whether a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.presign_upload_ttl_secs, 600);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert!(config.is_mime_type_allowed("application/pdf"));
        assert!(!config.is_mime_type_allowed("application/x-executable"));
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(StorageProvider::local_fs("./x").name(), "local");
        assert_eq!(
            StorageProvider::s3(None, "b", "k", "s", "eu-north-1").name(),
            "s3"
        );
    }
}
