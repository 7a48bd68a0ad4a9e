use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;
use crate::infrastructure::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Ten years.
pub const MAX_JOB_AGE_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub supabase: SupabaseSettings,
    pub logging: LoggingSettings,
    pub worker: WorkerSettings,
    pub rate_limit: RateLimitSettings,
    pub jobs: JobSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub max_file_size_bytes: u64,
    /// Key rate limiting on `X-Forwarded-For`. Only safe behind a proxy
    /// that overwrites the header.
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub max_workers: usize,
    pub queue_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    pub requests_per_second: f64,
    pub burst: u32,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSettings {
    pub max_age_secs: u64,
    pub reap_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub temp_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Settings {
    /// Layers defaults, `appsettings.{environment}` (optional) and
    /// `APP__SECTION__KEY` environment variables, then validates the result.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("server.api_key", "")?
            .set_default("server.max_file_size_bytes", 5_i64 * 1024 * 1024)?
            .set_default("server.trust_forwarded_for", false)?
            .set_default("gemini.api_key", "")?
            .set_default("gemini.model", DEFAULT_MODEL)?
            .set_default("gemini.base_url", DEFAULT_BASE_URL)?
            .set_default("gemini.timeout_secs", 30_i64)?
            .set_default("supabase.url", "")?
            .set_default("supabase.key", "")?
            .set_default("supabase.timeout_secs", 30_i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("worker.max_workers", 4_i64)?
            .set_default("worker.queue_size", 100_i64)?
            .set_default("rate_limit.requests_per_second", 10.0)?
            .set_default("rate_limit.burst", 20_i64)?
            .set_default("rate_limit.cleanup_interval_secs", 60_i64)?
            .set_default("jobs.max_age_secs", 24_i64 * 60 * 60)?
            .set_default("jobs.reap_interval_secs", 60_i64 * 60)?
            .set_default("storage.temp_dir", "/tmp/todo-agent")?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if self.server.port == 0 {
            return invalid("server port must be positive");
        }
        if self.server.api_key.trim().is_empty() {
            return invalid("server API key is required");
        }
        if self.gemini.api_key.trim().is_empty() {
            return invalid("gemini API key is required");
        }
        if self.supabase.url.trim().is_empty() {
            return invalid("supabase URL is required");
        }
        if self.supabase.key.trim().is_empty() {
            return invalid("supabase key is required");
        }
        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SettingsError::Invalid(format!(
                "invalid log level: {}",
                self.logging.level
            )));
        }
        if self.worker.max_workers == 0 || self.worker.queue_size == 0 {
            return invalid("worker max_workers and queue_size must be positive");
        }
        let refill = self.rate_limit.requests_per_second;
        if self.rate_limit.burst == 0 || !refill.is_finite() || refill <= 0.0 {
            return invalid("rate limit burst and requests_per_second must be positive");
        }
        if self.rate_limit.cleanup_interval_secs == 0 || self.jobs.reap_interval_secs == 0 {
            return invalid("cleanup intervals must be positive");
        }
        if self.jobs.max_age_secs == 0 || self.jobs.max_age_secs > MAX_JOB_AGE_SECS {
            return Err(SettingsError::Invalid(format!(
                "jobs max_age_secs must be between 1 and {MAX_JOB_AGE_SECS}"
            )));
        }

        Ok(())
    }
}

impl GeminiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SupabaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RateLimitSettings {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl JobSettings {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs)
    }
}
