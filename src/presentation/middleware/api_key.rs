use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::presentation::handlers::error_response;
use crate::presentation::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests that carry neither a matching `X-API-Key` header nor a
/// matching `Authorization: Bearer` token.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .or_else(|| request.headers().get(AUTHORIZATION))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim());

    match presented {
        Some(key) if !key.is_empty() && key == &*state.api_key => next.run(request).await,
        _ => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with invalid API key");
            error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid or missing API key",
            )
        }
    }
}
