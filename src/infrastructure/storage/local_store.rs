use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Staging area in a local directory (`storage.temp_dir`).
///
/// Uploads are capped by the HTTP body limit, so a file is buffered in
/// full and written with a single `put`. Nothing becomes visible under
/// `path` until the whole stream has been read.
pub struct LocalStagingStore {
    fs: Arc<LocalFileSystem>,
}

impl LocalStagingStore {
    pub fn new(root: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&root)?;
        let fs = LocalFileSystem::new_with_prefix(&root)
            .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))?;

        tracing::info!(root = %root.display(), "Local staging store ready");
        Ok(Self { fs: Arc::new(fs) })
    }
}

fn location(path: &StoragePath) -> ObjectPath {
    ObjectPath::from(path.as_str())
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        let size = buffer.len() as u64;
        self.fs
            .put(&location(path), PutPayload::from(buffer.freeze()))
            .await
            .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(path = %path, bytes = size, "Upload staged");
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        let object = self.fs.get(&location(path)).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StagingStoreError::NotFound(path.to_string()),
            other => StagingStoreError::ReadFailed(other.to_string()),
        })?;

        let bytes = object
            .bytes()
            .await
            .map_err(|e| StagingStoreError::ReadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        match self.fs.delete(&location(path)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(StagingStoreError::DeleteFailed(e.to_string())),
        }
    }
}
