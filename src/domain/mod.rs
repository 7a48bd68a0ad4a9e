mod input_kind;
mod job;
mod job_id;
mod job_status;
mod staged_file;
mod storage_path;
mod todo;
mod token_bucket;

pub use input_kind::{InputKind, extension_of};
pub use job::{Job, JobInput};
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use staged_file::StagedFile;
pub use storage_path::StoragePath;
pub use todo::{ProcessingResult, Todo, TodoCandidate, TodoItem, parse_due_date};
pub use token_bucket::TokenBucket;
