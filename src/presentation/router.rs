use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    client_jobs_handler, health_handler, job_status_handler, process_handler,
};
use crate::presentation::middleware::{api_key_middleware, rate_limit_middleware};
use crate::presentation::state::AppState;

/// Room for multipart framing and the text fields around the file part.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit = usize::try_from(state.max_file_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    // Layers run bottom-up: rate limiting sees the request before auth.
    let api = Router::new()
        .route("/api/v1/process", post(process_handler))
        .route("/process", post(process_handler))
        .route("/api/v1/status/{job_id}", get(job_status_handler))
        .route("/status/{job_id}", get(job_status_handler))
        .route("/api/v1/clients/{client_id}/jobs", get(client_jobs_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
