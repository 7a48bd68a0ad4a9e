use std::path::PathBuf;
use std::time::Duration;

use todo_agent::presentation::config::{
    GeminiSettings, JobSettings, MAX_JOB_AGE_SECS, LoggingSettings, RateLimitSettings, ServerSettings, Settings,
    SettingsError, StorageSettings, SupabaseSettings, WorkerSettings,
};

fn valid_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_key: "server-key".to_string(),
            max_file_size_bytes: 5 * 1024 * 1024,
            trust_forwarded_for: false,
        },
        gemini: GeminiSettings {
            api_key: "gemini-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        },
        supabase: SupabaseSettings {
            url: "https://example.supabase.co".to_string(),
            key: "supabase-key".to_string(),
            timeout_secs: 30,
        },
        logging: LoggingSettings {
            level: "info".to_string(),
            json: false,
        },
        worker: WorkerSettings {
            max_workers: 4,
            queue_size: 100,
        },
        rate_limit: RateLimitSettings {
            requests_per_second: 10.0,
            burst: 20,
            cleanup_interval_secs: 60,
        },
        jobs: JobSettings {
            max_age_secs: 86_400,
            reap_interval_secs: 3_600,
        },
        storage: StorageSettings {
            temp_dir: PathBuf::from("/tmp/todo-agent"),
        },
    }
}

fn assert_invalid(settings: Settings, fragment: &str) {
    match settings.validate() {
        Err(SettingsError::Invalid(message)) => {
            assert!(message.contains(fragment), "{message}")
        }
        other => panic!("expected invalid settings, got {other:?}"),
    }
}

#[test]
fn given_complete_settings_when_validating_then_passes() {
    assert!(valid_settings().validate().is_ok());
}

#[test]
fn given_missing_credentials_when_validating_then_names_the_missing_key() {
    let mut settings = valid_settings();
    settings.gemini.api_key = " ".to_string();
    assert_invalid(settings, "gemini API key");

    let mut settings = valid_settings();
    settings.supabase.url.clear();
    assert_invalid(settings, "supabase URL");

    let mut settings = valid_settings();
    settings.server.api_key.clear();
    assert_invalid(settings, "server API key");
}

#[test]
fn given_unknown_log_level_when_validating_then_fails() {
    let mut settings = valid_settings();
    settings.logging.level = "verbose".to_string();
    assert_invalid(settings, "verbose");
}

#[test]
fn given_zero_sized_worker_pool_when_validating_then_fails() {
    let mut settings = valid_settings();
    settings.worker.max_workers = 0;
    assert_invalid(settings, "max_workers");
}

#[test]
fn given_non_positive_refill_rate_when_validating_then_fails() {
    let mut settings = valid_settings();
    settings.rate_limit.requests_per_second = 0.0;
    assert_invalid(settings, "requests_per_second");
}

#[test]
fn given_nan_refill_rate_when_validating_then_fails() {
    let mut settings = valid_settings();
    settings.rate_limit.requests_per_second = f64::NAN;
    assert_invalid(settings, "requests_per_second");

    let mut settings = valid_settings();
    settings.rate_limit.requests_per_second = f64::INFINITY;
    assert_invalid(settings, "requests_per_second");
}

#[test]
fn given_job_max_age_out_of_range_when_validating_then_fails() {
    let mut settings = valid_settings();
    settings.jobs.max_age_secs = MAX_JOB_AGE_SECS + 1;
    assert_invalid(settings, "max_age_secs");

    let mut settings = valid_settings();
    settings.jobs.max_age_secs = 0;
    assert_invalid(settings, "max_age_secs");

    let mut settings = valid_settings();
    settings.jobs.max_age_secs = MAX_JOB_AGE_SECS;
    assert!(settings.validate().is_ok());
}

#[test]
fn given_second_based_fields_when_reading_durations_then_converts() {
    let settings = valid_settings();
    assert_eq!(settings.jobs.max_age(), Duration::from_secs(86_400));
    assert_eq!(settings.rate_limit.cleanup_interval(), Duration::from_secs(60));
    assert_eq!(settings.gemini.timeout(), Duration::from_secs(30));
}
