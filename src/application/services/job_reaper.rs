use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::JobRepository;

/// Periodically drops jobs older than `max_age` from the registry.
pub struct JobReaper {
    job_repository: Arc<dyn JobRepository>,
    max_age: chrono::Duration,
    interval: Duration,
}

impl JobReaper {
    pub fn new(job_repository: Arc<dyn JobRepository>, max_age: Duration, interval: Duration) -> Self {
        Self {
            job_repository,
            max_age: chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX),
            interval,
        }
    }

    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_age_secs = self.max_age.num_seconds(),
            "Job reaper started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        // The first tick completes immediately; nothing is old enough yet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.reap_once().await;
        }
    }

    pub async fn reap_once(&self) -> usize {
        match self.job_repository.reap(self.max_age).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::error!(error = %e, "Job reap failed");
                0
            }
        }
    }
}
