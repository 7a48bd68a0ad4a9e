use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobInput, JobStatus};

use super::ProcessingMessage;

/// Entry point into the job subsystem used by the HTTP layer.
pub struct JobService {
    job_repository: Arc<dyn JobRepository>,
    sender: mpsc::Sender<ProcessingMessage>,
}

impl JobService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        sender: mpsc::Sender<ProcessingMessage>,
    ) -> Self {
        Self {
            job_repository,
            sender,
        }
    }

    /// Registers a `Pending` job and queues it for processing without
    /// waiting for the pipeline.
    ///
    /// When the queue cannot take the job it is marked `Failed` before the
    /// error is returned, so no job is ever stranded in `Pending`.
    pub async fn submit(&self, client_id: String, input: JobInput) -> Result<JobId, SubmitError> {
        let job = Job::new(client_id, input);
        let job_id = job.id;
        let kind = job.kind;

        self.job_repository.create(&job).await?;

        match self.sender.try_send(ProcessingMessage { job }) {
            Ok(()) => {
                tracing::info!(job_id = %job_id, kind = %kind, "Job submitted for processing");
                Ok(job_id)
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(job_id = %job_id, "Processing queue full, rejecting job");
                self.fail_unscheduled(job_id, "processing queue is full")
                    .await;
                Err(SubmitError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => {
                tracing::error!(job_id = %job_id, "Processing worker unavailable");
                self.fail_unscheduled(job_id, "processing worker unavailable")
                    .await;
                Err(SubmitError::WorkerUnavailable)
            }
        }
    }

    pub async fn get_status(&self, job_id: JobId) -> Result<Job, RepositoryError> {
        self.job_repository.get_by_id(job_id).await
    }

    pub async fn list_for_client(&self, client_id: &str) -> Result<Vec<Job>, RepositoryError> {
        self.job_repository.list_by_client(client_id).await
    }

    async fn fail_unscheduled(&self, job_id: JobId, reason: &str) {
        if let Err(e) = self
            .job_repository
            .update(job_id, JobStatus::Failed, None, Some(reason.to_string()))
            .await
        {
            tracing::error!(job_id = %job_id, error = %e, "Failed to mark unscheduled job as failed");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("processing queue is full")]
    QueueFull,
    #[error("processing worker unavailable")]
    WorkerUnavailable,
}
