use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, ProcessingResult};

/// Process-local job registry backed by a sharded concurrent map.
///
/// Writers to one job hold its shard's write lock for the whole update, so
/// a concurrent `get_by_id` sees either the old record or the new one.
/// Jobs in different shards never contend.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: DashMap<JobId, Job>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        match self.jobs.entry(job.id) {
            Entry::Occupied(_) => Err(RepositoryError::DuplicateId(job.id)),
            Entry::Vacant(slot) => {
                slot.insert(job.clone());
                tracing::debug!(client_id = %job.client_id, "Job registered");
                Ok(())
            }
        }
    }

    async fn get_by_id(&self, id: JobId) -> Result<Job, RepositoryError> {
        self.jobs
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(RepositoryError::NotFound(id))
    }

    #[instrument(skip(self, result, error_message), fields(job_id = %id, status = %status))]
    async fn update(
        &self,
        id: JobId,
        status: JobStatus,
        result: Option<ProcessingResult>,
        error_message: Option<String>,
    ) -> Result<(), RepositoryError> {
        let mut job = self.jobs.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;

        job.status = status;
        job.result = result;
        job.error_message = error_message;
        job.updated_at = Utc::now();

        Ok(())
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Job>, RepositoryError> {
        Ok(self
            .jobs
            .iter()
            .filter(|entry| entry.client_id == client_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn reap(&self, max_age: Duration) -> Result<usize, RepositoryError> {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
            tracing::debug!(
                max_age_secs = max_age.num_seconds(),
                "Job max age reaches past the earliest representable time; nothing to reap"
            );
            return Ok(0);
        };
        let mut removed = 0;

        self.jobs.retain(|_, job| {
            let keep = job.created_at >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            tracing::info!(deleted_count = removed, "Cleaned up old jobs");
        }
        Ok(removed)
    }
}
