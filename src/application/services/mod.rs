mod job_reaper;
mod job_service;
mod processing_pipeline;
mod processing_worker;
mod rate_limiter;

pub use job_reaper::JobReaper;
pub use job_service::{JobService, SubmitError};
pub use processing_pipeline::{ProcessingError, ProcessingMessage, ProcessingPipeline};
pub use processing_worker::ProcessingWorker;
pub use rate_limiter::RateLimiter;
