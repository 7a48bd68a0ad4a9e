use async_trait::async_trait;

use crate::domain::Todo;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persists all records in one request. An empty batch succeeds without
    /// touching the store.
    async fn insert_batch(&self, todos: &[Todo]) -> Result<(), TodoStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TodoStoreError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("insert rejected with status {status}: {body}")]
    InsertFailed { status: u16, body: String },
}
