use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

/// Holding area for uploads between the HTTP request and the pipeline run
/// that consumes them.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Writes the stream under `path` and returns the number of bytes
    /// stored. A stream error aborts the write.
    async fn store(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError>;

    /// Removing a path that is already gone succeeds.
    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("staged file not found: {0}")]
    NotFound(String),
    #[error("failed to write staged file: {0}")]
    WriteFailed(String),
    #[error("failed to read staged file: {0}")]
    ReadFailed(String),
    #[error("failed to delete staged file: {0}")]
    DeleteFailed(String),
    #[error("upload stream error: {0}")]
    Io(#[from] io::Error),
}
