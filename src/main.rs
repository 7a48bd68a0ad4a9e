use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use todo_agent::application::ports::{FileLoader, JobRepository, StagingStore};
use todo_agent::application::services::{
    JobReaper, JobService, ProcessingPipeline, ProcessingWorker, RateLimiter,
};
use todo_agent::domain::InputKind;
use todo_agent::infrastructure::llm::GeminiClient;
use todo_agent::infrastructure::observability::{TracingConfig, init_tracing};
use todo_agent::infrastructure::persistence::{InMemoryJobRepository, SupabaseTodoStore};
use todo_agent::infrastructure::storage::LocalStagingStore;
use todo_agent::infrastructure::text_processing::{
    CompositeFileLoader, PlaceholderAdapter, PlainTextAdapter,
};
use todo_agent::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::from_settings(
        environment.as_str(),
        &settings.logging,
    ));

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let staging_store: Arc<dyn StagingStore> = Arc::new(
        LocalStagingStore::new(settings.storage.temp_dir.clone())
            .context("Failed to prepare staging directory")?,
    );

    let placeholder: Arc<dyn FileLoader> = Arc::new(PlaceholderAdapter);
    let file_loader = Arc::new(
        CompositeFileLoader::new(vec![
            (InputKind::Image, Arc::clone(&placeholder)),
            (InputKind::Document, placeholder),
        ])
        .with_extension("txt", Arc::new(PlainTextAdapter)),
    );

    let todo_extractor = Arc::new(GeminiClient::new(
        settings.gemini.api_key.clone(),
        settings.gemini.model.clone(),
        settings.gemini.base_url.clone(),
        settings.gemini.timeout(),
    )?);
    let todo_store = Arc::new(SupabaseTodoStore::new(
        settings.supabase.url.clone(),
        settings.supabase.key.clone(),
        settings.supabase.timeout(),
    )?);

    let pipeline = Arc::new(ProcessingPipeline::new(
        Arc::clone(&job_repository),
        file_loader,
        todo_extractor,
        todo_store,
        Arc::clone(&staging_store),
    ));

    let (sender, receiver) = mpsc::channel(settings.worker.queue_size);
    let worker = ProcessingWorker::new(receiver, pipeline, settings.worker.max_workers);
    let worker_handle = tokio::spawn(worker.run());

    let reaper = JobReaper::new(
        Arc::clone(&job_repository),
        settings.jobs.max_age(),
        settings.jobs.reap_interval(),
    );
    tokio::spawn(reaper.run());

    let rate_limiter = Arc::new(RateLimiter::new(
        settings.rate_limit.burst,
        settings.rate_limit.requests_per_second,
        settings.rate_limit.cleanup_interval(),
    ));
    tokio::spawn(Arc::clone(&rate_limiter).run_idle_sweep());

    let state = AppState {
        job_service: Arc::new(JobService::new(job_repository, sender)),
        rate_limiter,
        staging_store,
        api_key: Arc::from(settings.server.api_key.as_str()),
        max_file_size_bytes: settings.server.max_file_size_bytes,
        trust_forwarded_for: settings.server.trust_forwarded_for,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(environment = %environment, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last sender; the worker drains in-flight jobs and exits.
    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "Processing worker panicked");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
