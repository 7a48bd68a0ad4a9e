use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use crate::presentation::handlers::error_response;
use crate::presentation::state::AppState;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Admission gate in front of the API routes. A denied request never
/// reaches a handler, so no job is created.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request, state.trust_forwarded_for);

    if !state.rate_limiter.allow(&client) {
        tracing::warn!(client = %client, "Request rejected by rate limiter");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limit_exceeded",
            "Too many requests",
        );
    }

    next.run(request).await
}

/// Peer address of the caller. With `trust_forwarded` set, the first hop
/// of `X-Forwarded-For` wins when present.
pub fn client_key<B>(request: &Request<B>, trust_forwarded: bool) -> String {
    let forwarded = request
        .headers()
        .get(FORWARDED_FOR_HEADER)
        .filter(|_| trust_forwarded)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
