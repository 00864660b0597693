//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File size exceeds maximum allowed.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// MIME type not allowed.
    #[error("MIME type '{mime_type}' is not allowed")]
    InvalidMimeType {
        /// The invalid MIME type.
        mime_type: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Creates a file-too-large error.
    #[must_use]
    pub const fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Creates an invalid MIME type error.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        Self::Operation(err.to_string())
    }
}
