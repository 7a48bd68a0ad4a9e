use crate::domain::JobId;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("duplicate job id: {0}")]
    DuplicateId(JobId),
}
