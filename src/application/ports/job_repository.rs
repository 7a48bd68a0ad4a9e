use async_trait::async_trait;
use chrono::Duration;

use crate::domain::{Job, JobId, JobStatus, ProcessingResult};

use super::RepositoryError;

/// Registry of in-flight and recently finished jobs.
///
/// Implementations are plain stores: they accept any status update and
/// leave enforcing the job state machine to the pipeline.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Job, RepositoryError>;

    /// Replaces status, result and error message in one step and bumps
    /// `updated_at`.
    async fn update(
        &self,
        id: JobId,
        status: JobStatus,
        result: Option<ProcessingResult>,
        error_message: Option<String>,
    ) -> Result<(), RepositoryError>;

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Job>, RepositoryError>;

    /// Removes jobs created more than `max_age` ago. Returns how many were removed.
    async fn reap(&self, max_age: Duration) -> Result<usize, RepositoryError>;
}
