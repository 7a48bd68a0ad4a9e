mod file_loader;
mod job_repository;
mod repository_error;
mod staging_store;
mod todo_extractor;
mod todo_store;

pub use file_loader::{FileLoader, FileLoaderError};
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
pub use staging_store::{StagingStore, StagingStoreError};
pub use todo_extractor::{TodoExtractor, TodoExtractorError};
pub use todo_store::{TodoStore, TodoStoreError};
