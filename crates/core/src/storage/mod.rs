//! Upload storage using Apache OpenDAL.
//!
//! The forms attach scanned invoices and receipts; the backend never
//! proxies the bytes. It hands the client a presigned PUT URL and lets it
//! talk to the bucket directly. S3-compatible providers and the local
//! filesystem (development) are supported.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{PresignedUrl, StorageService, UploadRequest};
