use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use super::{ProcessingMessage, ProcessingPipeline};

/// Drains the processing queue, running at most `max_concurrent_jobs`
/// pipelines at once. Messages wait in the channel while every slot is
/// busy.
pub struct ProcessingWorker {
    receiver: mpsc::Receiver<ProcessingMessage>,
    pipeline: Arc<ProcessingPipeline>,
    permits: Arc<Semaphore>,
    max_concurrent_jobs: usize,
}

impl ProcessingWorker {
    pub fn new(
        receiver: mpsc::Receiver<ProcessingMessage>,
        pipeline: Arc<ProcessingPipeline>,
        max_concurrent_jobs: usize,
    ) -> Self {
        let max_concurrent_jobs = max_concurrent_jobs.max(1);
        Self {
            receiver,
            pipeline,
            permits: Arc::new(Semaphore::new(max_concurrent_jobs)),
            max_concurrent_jobs,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent_jobs = self.max_concurrent_jobs,
            "Processing worker started"
        );

        let mut in_flight = JoinSet::new();

        while let Some(msg) = self.receiver.recv().await {
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                break;
            };

            let pipeline = Arc::clone(&self.pipeline);
            in_flight.spawn(async move {
                let _permit = permit;
                // Outcome is already recorded on the job and logged by the pipeline.
                let _ = pipeline.process(msg.job).await;
            });

            while in_flight.try_join_next().is_some() {}
        }

        while in_flight.join_next().await.is_some() {}
        tracing::info!("Processing worker stopped: channel closed");
    }
}
