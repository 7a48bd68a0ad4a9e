mod client_jobs;
mod error_response;
mod health;
mod job_status;
mod process;

pub use client_jobs::{ClientJobsResponse, client_jobs_handler};
pub use error_response::{ErrorResponse, error_response};
pub use health::{HealthResponse, health_handler};
pub use job_status::{JobStatusResponse, job_status_handler};
pub use process::{ProcessResponse, process_handler};
