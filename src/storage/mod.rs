//! Object storage the upload pipeline relays staged files to.

mod s3;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

pub use s3::{S3ObjectStore, create_s3_client};

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The staged file could not be read back from local disk
    #[error("failed to read staged file: {0}")]
    Staging(String),

    /// The remote store rejected or failed the upload
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Remote store for uploaded article images.
///
/// Implementations upload the file at `path` under `key`. The caller owns the
/// staged file and removes it once the call returns.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, path: &Path, content_type: &str) -> Result<(), StorageError>;
}
