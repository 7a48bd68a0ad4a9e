use std::sync::Arc;

use tokio::sync::mpsc;

use todo_agent::application::ports::{FileLoader, JobRepository};
use todo_agent::application::services::{
    JobService, ProcessingPipeline, ProcessingWorker,
};
use todo_agent::domain::{JobInput, JobStatus};
use todo_agent::infrastructure::persistence::InMemoryJobRepository;
use todo_agent::infrastructure::text_processing::PlaceholderAdapter;

use crate::common::{MemoryStagingStore, RecordingTodoStore, StubTodoExtractor, candidate};

#[tokio::test]
async fn given_submitted_jobs_when_channel_closes_then_worker_finishes_every_job() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let loader: Arc<dyn FileLoader> = Arc::new(PlaceholderAdapter);
    let pipeline = Arc::new(ProcessingPipeline::new(
        repository.clone(),
        loader,
        Arc::new(StubTodoExtractor::returning(vec![candidate("Task", "", None)])),
        Arc::new(RecordingTodoStore::default()),
        Arc::new(MemoryStagingStore::default()),
    ));

    let (sender, receiver) = mpsc::channel(16);
    let worker = tokio::spawn(ProcessingWorker::new(receiver, pipeline, 2).run());
    let service = JobService::new(repository.clone(), sender);

    let mut ids = Vec::new();
    for i in 0..5 {
        let input = JobInput::Text(format!("task number {i}"));
        ids.push(service.submit("user-1".to_string(), input).await.unwrap());
    }
    drop(service);

    worker.await.unwrap();

    for id in ids {
        let job = repository.get_by_id(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result.unwrap().todos.len(), 1);
    }
}
