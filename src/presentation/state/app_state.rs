use std::sync::Arc;

use crate::application::ports::StagingStore;
use crate::application::services::{JobService, RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub job_service: Arc<JobService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub staging_store: Arc<dyn StagingStore>,
    pub api_key: Arc<str>,
    pub max_file_size_bytes: u64,
    pub trust_forwarded_for: bool,
}
