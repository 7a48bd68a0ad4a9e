use std::sync::Arc;

use chrono::Utc;
use tracing::Instrument;

use crate::application::ports::{
    FileLoader, FileLoaderError, JobRepository, RepositoryError, StagingStore, TodoExtractor,
    TodoExtractorError, TodoStore, TodoStoreError,
};
use crate::domain::{
    InputKind, Job, JobId, JobInput, JobStatus, ProcessingResult, Todo, TodoItem,
};

/// A job handed from the entry point to the worker pool.
pub struct ProcessingMessage {
    pub job: Job,
}

/// Drives a single job from `Pending` to a terminal state.
///
/// The pipeline is the only writer of a job once it has been submitted and
/// the only component that knows the state graph; the repository just
/// stores whatever it is told.
pub struct ProcessingPipeline {
    job_repository: Arc<dyn JobRepository>,
    file_loader: Arc<dyn FileLoader>,
    todo_extractor: Arc<dyn TodoExtractor>,
    todo_store: Arc<dyn TodoStore>,
    staging_store: Arc<dyn StagingStore>,
}

impl ProcessingPipeline {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        file_loader: Arc<dyn FileLoader>,
        todo_extractor: Arc<dyn TodoExtractor>,
        todo_store: Arc<dyn TodoStore>,
        staging_store: Arc<dyn StagingStore>,
    ) -> Self {
        Self {
            job_repository,
            file_loader,
            todo_extractor,
            todo_store,
            staging_store,
        }
    }

    /// Runs every stage for `job` and records the outcome on the job.
    ///
    /// Stage failures are not returned: they leave the job `Failed` and the
    /// call reports `Ok(JobStatus::Failed)`. An `Err` means the registry
    /// itself refused an update, typically because the job was reaped
    /// mid-flight. The staged upload is removed on every path.
    pub async fn process(&self, job: Job) -> Result<JobStatus, RepositoryError> {
        let span = tracing::info_span!(
            "processing_job",
            job_id = %job.id,
            client_id = %job.client_id,
            kind = %job.kind,
        );

        async move {
            tracing::info!("Starting job processing");

            let outcome = self.process_job(&job).await;
            if let Err(e) = &outcome {
                tracing::error!(error = %e, "Failed to record job state");
            }

            self.cleanup(&job).await;
            outcome
        }
        .instrument(span)
        .await
    }

    async fn process_job(&self, job: &Job) -> Result<JobStatus, RepositoryError> {
        self.update_status(job.id, JobStatus::Processing, None, None)
            .await?;

        match self.run_stages(job).await {
            Ok(result) => {
                let todos_count = result.todos.len();
                self.update_status(job.id, JobStatus::Completed, Some(result), None)
                    .await?;
                tracing::info!(todos_count, "Job processing completed");
                Ok(JobStatus::Completed)
            }
            Err(e) => {
                tracing::error!(error = %e, "Job processing failed");
                self.update_status(job.id, JobStatus::Failed, None, Some(e.to_string()))
                    .await?;
                Ok(JobStatus::Failed)
            }
        }
    }

    async fn run_stages(&self, job: &Job) -> Result<ProcessingResult, ProcessingError> {
        let text = self.extract_text(job).await?;
        tracing::debug!(chars = text.chars().count(), "Text extracted");

        let candidates = self
            .todo_extractor
            .extract_todos(&text)
            .await
            .map_err(ProcessingError::AiExtractionFailed)?;
        tracing::debug!(candidates = candidates.len(), "AI extraction finished");

        let items: Vec<TodoItem> = candidates.into_iter().map(TodoItem::from).collect();
        self.persist(job, &items).await?;

        Ok(ProcessingResult::new(items))
    }

    async fn extract_text(&self, job: &Job) -> Result<String, ProcessingError> {
        match (&job.input, job.kind) {
            (JobInput::Text(content), InputKind::Text) => Ok(content.clone()),
            (JobInput::File(file), InputKind::Image | InputKind::Document)
                if file.kind == job.kind =>
            {
                let data = self.staging_store.fetch(&file.path).await.map_err(|e| {
                    ProcessingError::ExtractionFailed(format!("staged file unavailable: {}", e))
                })?;

                self.file_loader
                    .extract_text(&data, file)
                    .await
                    .map_err(|e| match e {
                        FileLoaderError::UnsupportedKind(kind) => {
                            ProcessingError::UnsupportedKind(kind)
                        }
                        FileLoaderError::ExtractionFailed(msg) => {
                            ProcessingError::ExtractionFailed(msg)
                        }
                    })
            }
            (input, kind) => Err(ProcessingError::UnsupportedKind(format!(
                "{} job carrying {} input",
                kind,
                input.kind()
            ))),
        }
    }

    async fn persist(&self, job: &Job, items: &[TodoItem]) -> Result<(), ProcessingError> {
        if items.is_empty() {
            tracing::debug!("No todos extracted, skipping persistence");
            return Ok(());
        }

        let now = Utc::now();
        let todos: Vec<Todo> = items
            .iter()
            .map(|item| Todo::from_item(item, &job.client_id, job.kind, now))
            .collect();

        self.todo_store
            .insert_batch(&todos)
            .await
            .map_err(ProcessingError::PersistenceFailed)
    }

    async fn cleanup(&self, job: &Job) {
        let Some(file) = job.input.staged_file() else {
            return;
        };

        match self.staging_store.delete(&file.path).await {
            Ok(()) => tracing::debug!(path = %file.path, "Staged file removed"),
            Err(e) => tracing::warn!(
                error = %e,
                path = %file.path,
                "Failed to clean up staged file"
            ),
        }
    }

    async fn update_status(
        &self,
        job_id: JobId,
        status: JobStatus,
        result: Option<ProcessingResult>,
        error_message: Option<String>,
    ) -> Result<(), RepositoryError> {
        tracing::debug!(status = %status, "Job status transition");
        self.job_repository
            .update(job_id, status, result, error_message)
            .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("unsupported input: {0}")]
    UnsupportedKind(String),
    #[error("AI extraction failed: {0}")]
    AiExtractionFailed(TodoExtractorError),
    #[error("persistence failed: {0}")]
    PersistenceFailed(TodoStoreError),
}
