use async_trait::async_trait;

use crate::domain::TodoCandidate;

#[async_trait]
pub trait TodoExtractor: Send + Sync {
    async fn extract_todos(&self, text: &str) -> Result<Vec<TodoCandidate>, TodoExtractorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TodoExtractorError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
