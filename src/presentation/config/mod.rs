mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    GeminiSettings, JobSettings, MAX_JOB_AGE_SECS, LoggingSettings, RateLimitSettings, ServerSettings, Settings,
    SettingsError, StorageSettings, SupabaseSettings, WorkerSettings,
};
